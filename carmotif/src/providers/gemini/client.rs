//! Gemini API client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{ProviderError, Result};
use crate::generation::{ContentGenerator, GenerateRequest, GenerateResponse};

use super::config::GeminiConfig;
use super::types::{GeminiErrorResponse, GeminiRequest, GeminiResponse};

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct Gemini {
    pub(crate) config: Arc<GeminiConfig>,
    pub(crate) client: Client,
}

impl Gemini {
    /// Create a new Gemini client with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ProviderError::auth("gemini", "API key is required").into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| ProviderError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Model used for image+text generation.
    #[must_use]
    pub fn image_model(&self) -> &str {
        &self.config.image_model
    }

    /// Model used for text-only requests.
    #[must_use]
    pub fn text_model(&self) -> &str {
        &self.config.text_model
    }

    /// Build the `generateContent` URL for a model.
    pub(crate) fn generate_url(&self, model: &str) -> String {
        let model = if model.is_empty() {
            self.config.image_model.as_str()
        } else {
            model
        };
        format!(
            "{}/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
    }

    /// Parse an error response.
    pub(crate) fn parse_error(status: u16, body: &str) -> ProviderError {
        if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(body) {
            let error = error_response.error;
            return match status {
                401 | 403 => ProviderError::auth("gemini", error.message),
                429 => ProviderError::rate_limited("gemini"),
                _ => match error.status {
                    Some(code) => ProviderError::provider_code("gemini", code, error.message),
                    None => ProviderError::provider("gemini", error.message),
                },
            };
        }

        match status {
            401 | 403 => ProviderError::auth("gemini", body.to_owned()),
            429 => ProviderError::rate_limited("gemini"),
            _ => ProviderError::http_status(status, body.to_owned()),
        }
    }
}

#[async_trait]
impl ContentGenerator for Gemini {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = self.generate_url(&request.model);
        let body = GeminiRequest::from_request(request);

        debug!(
            url = %url,
            images = request.image_count(),
            modalities = ?request.modalities,
            "Sending generateContent request"
        );

        let response = self
            .build_request(&url)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "generateContent request failed");
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let text = response.text().await.map_err(ProviderError::from)?;
        let parsed: GeminiResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::response_format("generateContent response JSON", e.to_string())
        })?;

        if let Some(reason) = parsed.block_reason() {
            warn!(reason, "Prompt was blocked");
            return Err(ProviderError::provider_code(
                "gemini",
                reason,
                format!("The request was blocked ({reason})."),
            )
            .into());
        }

        let response = parsed.into_response();
        debug!(parts = response.parts.len(), "Received generateContent response");
        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn client() -> Gemini {
        Gemini::new(GeminiConfig::new("key").with_base_url("http://localhost:1/v1beta/")).unwrap()
    }

    #[test]
    fn test_requires_key() {
        let err = Gemini::new(GeminiConfig::default()).unwrap_err();
        assert!(err.is_auth());
    }

    #[test]
    fn test_generate_url() {
        let gemini = client();
        assert_eq!(
            gemini.generate_url("gemini-2.5-flash"),
            "http://localhost:1/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            gemini.generate_url(""),
            format!(
                "http://localhost:1/v1beta/models/{}:generateContent",
                GeminiConfig::DEFAULT_IMAGE_MODEL
            )
        );
    }

    #[test]
    fn test_parse_error_auth() {
        let body = r#"{"error":{"code":403,"message":"API key not valid.","status":"PERMISSION_DENIED"}}"#;
        let err = Gemini::parse_error(403, body);
        assert!(err.is_auth());
        assert_eq!(err.to_string(), "[gemini] API key not valid.");
    }

    #[test]
    fn test_parse_error_rate_limited() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            Gemini::parse_error(429, body),
            ProviderError::RateLimited { .. }
        ));
    }

    #[test]
    fn test_parse_error_with_status_code() {
        let body = r#"{"error":{"code":400,"message":"Bad image","status":"INVALID_ARGUMENT"}}"#;
        match Gemini::parse_error(400, body) {
            ProviderError::Provider { code, message, .. } => {
                assert_eq!(code.as_deref(), Some("INVALID_ARGUMENT"));
                assert_eq!(message, "Bad image");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_unstructured() {
        let err = Gemini::parse_error(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }
}
