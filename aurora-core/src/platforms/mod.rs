// src/platforms/mod.rs

pub mod twilio;
pub mod imgbb;

pub use twilio::{bare_number, whatsapp_address, TwilioMessenger, TwilioSettings};
pub use imgbb::{ImgbbHost, ImgbbSettings};

/// Longest provider error body echoed back to the operator.
pub(crate) const ERROR_BODY_CHARS: usize = 200;
