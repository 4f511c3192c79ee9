//! HTTP implementation of [`MediaBackend`] on top of reqwest.
//!
//! All parameters are embedded in the path; no bodies, no auth headers.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Method;
use serde_json::Value;

use super::client::{BackendError, MediaBackend};

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout ({e}), using defaults");
                reqwest::Client::new()
            });

        Self { base_url, client }
    }

    async fn request(&self, method: Method, path: &str) -> Result<Value, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let response = self
            .client
            .request(method.clone(), &url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("{} {} failed: {} - {}", method, path, status, message);
            return Err(BackendError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        debug!("{} {} -> {} ({} bytes)", method, path, status, body.len());

        // 204-style empty bodies count as JSON null
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!("{} {} returned invalid JSON: {}", method, path, e);
            BackendError::Network(format!("invalid JSON: {e}"))
        })
    }
}

#[async_trait]
impl MediaBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str) -> Result<Value, BackendError> {
        self.request(Method::GET, path).await
    }

    async fn post_json(&self, path: &str) -> Result<Value, BackendError> {
        self.request(Method::POST, path).await
    }
}
