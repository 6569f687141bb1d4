// src/lib.rs

pub mod db;
pub mod http;
pub mod repositories;
pub mod platforms;
pub mod cache;
pub mod services;
pub mod render;
pub mod utils;
pub mod test_utils;

pub use db::{Database, DatabaseSettings};
pub use aurora_common::error::{Error, ErrorKind};
pub use aurora_common::models;
pub use http::{DefaultHttpClient, FormRequest, HttpClient, HttpResponse};
