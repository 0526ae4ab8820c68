//! Outbound generative-text calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;

use super::error::NormalizationError;
use super::types::{GenerateContentRequest, RawGenerativeResponse};
use crate::constants::GATEWAY_POOL_MAX_IDLE_PER_HOST;

#[async_trait]
/// Sends one prompt to a text generator and returns its raw response.
pub trait GenerativeTextGateway: Send + Sync {
    /// Fails with `Transport` on network/timeout/status/decoding problems and with
    /// `EmptyResponse` when no candidate carries text.
    async fn call(&self, prompt: &str) -> Result<RawGenerativeResponse, NormalizationError>;
}

/// Gemini `generateContent` client.
pub struct GeminiGateway {
    http: HttpClient,
    api_url: String,
    api_key: String,
    temperature: f32,
}

impl GeminiGateway {
    /// Builds a gateway with its own pooled client. `timeout` bounds each call.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, NormalizationError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(GATEWAY_POOL_MAX_IDLE_PER_HOST)
            .build()?;

        Ok(Self::with_client(http, api_url, api_key, temperature))
    }

    /// Reuses an existing client (and its pool).
    pub fn with_client(
        http: HttpClient,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
            temperature,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl std::fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[async_trait]
impl GenerativeTextGateway for GeminiGateway {
    async fn call(&self, prompt: &str) -> Result<RawGenerativeResponse, NormalizationError> {
        let body = GenerateContentRequest::new(prompt, self.temperature);

        let response = self
            .http
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        debug!(status = %response.status(), "generateContent responded");

        let raw: RawGenerativeResponse = response.json().await?;
        if raw.first_text().is_none() {
            return Err(NormalizationError::EmptyResponse);
        }
        Ok(raw)
    }
}
