//! HTTP client abstraction for the provider integrations.
//!
//! Both providers (message delivery and image hosting) speak
//! `application/x-www-form-urlencoded` POSTs, so the trait only carries that
//! shape. Going through the trait lets tests:
//!
//! - assert that a flow never touched the network (e.g. a missing API key)
//! - inspect exactly which form fields a provider would have sent
//! - feed canned provider responses, success or rejection
//!
//! The default implementation wraps reqwest.

use async_trait::async_trait;
use tracing::debug;

use crate::Error;

/// A form POST, fully owned so it can be recorded by test doubles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRequest {
    pub url: String,
    /// `(username, password)` for HTTP basic auth.
    pub basic_auth: Option<(String, String)>,
    pub query: Vec<(String, String)>,
    pub fields: Vec<(String, String)>,
}

impl FormRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn basic_auth(mut self, user: &str, password: &str) -> Self {
        self.basic_auth = Some((user.to_string(), password.to_string()));
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    /// First value sent under `key`.
    pub fn field_value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body; providers decide what a non-2xx body means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn post_form(&self, request: FormRequest) -> Result<HttpResponse, Error>;
}

#[derive(Clone, Default)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn post_form(&self, request: FormRequest) -> Result<HttpResponse, Error> {
        debug!(url = %request.url, fields = request.fields.len(), "POST form");
        let mut builder = self.client.post(&request.url);
        if let Some((user, password)) = &request.basic_auth {
            builder = builder.basic_auth(user, Some(password));
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        let response = builder.form(&request.fields).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
