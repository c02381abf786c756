//! ElevenLabs API client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{ProviderError, Result};
use crate::speech::{SpeechRequest, SpeechResponse, SpeechSynthesizer};

use super::config::ElevenLabsConfig;
use super::types::{ElevenLabsErrorResponse, ElevenLabsSpeechRequest};

/// MIME type requested for synthesized audio.
const AUDIO_MPEG: &str = "audio/mpeg";

/// ElevenLabs API client.
#[derive(Debug, Clone)]
pub struct ElevenLabs {
    pub(crate) config: Arc<ElevenLabsConfig>,
    pub(crate) client: Client,
}

impl ElevenLabs {
    /// Create a new ElevenLabs client with the given configuration.
    pub fn new(config: ElevenLabsConfig) -> Result<Self> {
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

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build the text-to-speech URL for a voice.
    pub(crate) fn speech_url(&self, voice_id: &str) -> String {
        format!(
            "{}/text-to-speech/{voice_id}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Describe a failed response: the structured `detail` message when
    /// present, otherwise the raw body.
    pub(crate) fn describe_error(status: u16, body: &str) -> String {
        let message = serde_json::from_str::<ElevenLabsErrorResponse>(body)
            .ok()
            .and_then(|r| r.detail)
            .and_then(|d| d.message().map(str::to_owned));
        match message {
            Some(message) => format!("Status: {status}. Message: {message}"),
            None => format!("Status: {status}. Body: {body}"),
        }
    }

    /// Parse an error response.
    pub(crate) fn parse_error(status: u16, body: &str) -> ProviderError {
        let details = Self::describe_error(status, body);
        match status {
            401 => ProviderError::auth("elevenlabs", details),
            429 => ProviderError::provider_code("elevenlabs", "rate_limited", details),
            _ => ProviderError::provider_code("elevenlabs", status.to_string(), details),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabs {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechResponse> {
        let url = self.speech_url(&request.voice_id);
        let body = ElevenLabsSpeechRequest::from(request);

        debug!(
            voice_id = %request.voice_id,
            model_id = %request.model_id,
            chars = request.text.chars().count(),
            "Sending text-to-speech request"
        );

        let response = self
            .client
            .post(&url)
            .header("Accept", AUDIO_MPEG)
            .header("Content-Type", "application/json")
            .header("xi-api-key", &request.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "text-to-speech request failed");
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(AUDIO_MPEG)
            .to_owned();
        let audio = response.bytes().await.map_err(ProviderError::from)?.to_vec();

        debug!(bytes = audio.len(), "Received synthesized audio");
        Ok(SpeechResponse::new(audio, mime_type))
    }

    fn provider_name(&self) -> &'static str {
        "elevenlabs"
    }

    fn default_model(&self) -> &str {
        &self.config.model_id
    }
}
