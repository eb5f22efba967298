//! HTTP client for the chat-completions gateway.

use reqwest::{Client, Response, StatusCode};
use serde_json::json;

use crate::prompts::GenerationType;
use crate::sse::collect_deltas;

/// Default gateway endpoint.
pub const DEFAULT_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1";

/// Default model requested from the gateway.
pub const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";

/// Configuration for the gateway client.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL, without the `/chat/completions` suffix
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Bearer token; requests fail with [`GatewayError::MissingApiKey`] without one
    pub api_key: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl GatewayConfig {
    /// Read the API key from the named environment variable.
    pub fn api_key_from_env(mut self, var: &str) -> Self {
        self.api_key = std::env::var(var).ok().filter(|key| !key.trim().is_empty());
        self
    }
}

/// Errors from the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway API key is not configured")]
    MissingApiKey,

    #[error("Rate limit exceeded. Please try again in a few seconds.")]
    RateLimited,

    #[error("Insufficient credits. Add credits to continue.")]
    PaymentRequired,

    #[error("AI service error")]
    Upstream { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),
}

/// Client for streaming completions.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Start a streamed completion for `prompt`.
    ///
    /// On success the response body is the gateway's raw SSE stream.
    pub async fn stream_completion(
        &self,
        kind: GenerationType,
        prompt: &str,
    ) -> Result<Response, GatewayError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingApiKey)?;

        let response = self
            .http
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&self.request_body(kind, prompt))
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::TOO_MANY_REQUESTS => Err(GatewayError::RateLimited),
            StatusCode::PAYMENT_REQUIRED => Err(GatewayError::PaymentRequired),
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::error!("AI gateway error: {} {}", status, body);
                Err(GatewayError::Upstream {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    /// Run a completion to the end, calling `on_delta` for each token chunk.
    pub async fn generate<F>(
        &self,
        kind: GenerationType,
        prompt: &str,
        on_delta: F,
    ) -> Result<String, GatewayError>
    where
        F: FnMut(&str),
    {
        let response = self.stream_completion(kind, prompt).await?;
        collect_deltas(response.bytes_stream(), on_delta)
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))
    }

    fn request_body(&self, kind: GenerationType, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": kind.system_prompt() },
                { "role": "user", "content": prompt },
            ],
            "stream": true,
        })
    }
}
