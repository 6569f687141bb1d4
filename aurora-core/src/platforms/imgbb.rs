// src/platforms/imgbb.rs

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::{info, warn};

use aurora_common::traits::provider_traits::ImageHost;
use crate::http::{FormRequest, HttpClient};
use crate::platforms::ERROR_BODY_CHARS;
use crate::render::preview;
use crate::Error;

pub const DEFAULT_IMGBB_API_BASE: &str = "https://api.imgbb.com";

#[derive(Clone)]
pub struct ImgbbSettings {
    pub api_key: Option<String>,
    pub api_base: String,
}

impl std::fmt::Debug for ImgbbSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImgbbSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for ImgbbSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_IMGBB_API_BASE.to_string(),
        }
    }
}

impl ImgbbSettings {
    pub fn has_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: UploadedImage,
}

#[derive(Debug, Deserialize)]
struct UploadedImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct UploadFailure {
    error: Option<UploadFailureDetail>,
}

#[derive(Debug, Deserialize)]
struct UploadFailureDetail {
    message: Option<String>,
    code: Option<i64>,
}

pub struct ImgbbHost {
    settings: ImgbbSettings,
    http: Arc<dyn HttpClient>,
}

impl ImgbbHost {
    pub fn new(settings: ImgbbSettings, http: Arc<dyn HttpClient>) -> Self {
        Self { settings, http }
    }

    pub fn build_request(&self, image: &[u8]) -> Result<FormRequest, Error> {
        let key = self
            .settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("IMGBB_API_KEY is not set".into()))?;
        if image.is_empty() {
            return Err(Error::InvalidInput("image is empty".into()));
        }

        let url = format!("{}/1/upload", self.settings.api_base.trim_end_matches('/'));
        Ok(FormRequest::new(url)
            .query("key", key)
            .field("image", &STANDARD.encode(image)))
    }
}

#[async_trait]
impl ImageHost for ImgbbHost {
    async fn upload(&self, image: &[u8]) -> Result<String, Error> {
        let request = self.build_request(image)?;
        let response = self.http.post_form(request).await?;

        if !response.is_success() {
            let detail = serde_json::from_str::<UploadFailure>(&response.body)
                .ok()
                .and_then(|f| f.error);
            let code = detail.as_ref().and_then(|d| d.code);
            let message = detail
                .and_then(|d| d.message)
                .unwrap_or_else(|| preview(&response.body, ERROR_BODY_CHARS));
            warn!(status = response.status, ?code, "imgbb rejected upload");
            return Err(Error::Provider {
                provider: "imgbb",
                status: response.status,
                code,
                message,
            });
        }

        let uploaded: UploadResponse = serde_json::from_str(&response.body)?;
        info!(url = %uploaded.data.url, bytes = image.len(), "image uploaded");
        Ok(uploaded.data.url)
    }
}
