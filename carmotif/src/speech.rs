//! Speech synthesis types and the provider trait.
//!
//! The speech credential is supplied per request: it is entered by the user
//! at runtime and never stored in configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default multilingual synthesis model.
pub const DEFAULT_SPEECH_MODEL: &str = "eleven_multilingual_v2";

/// Voice tuning sent with every synthesis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Voice stability (0.0 to 1.0).
    pub stability: f32,
    /// Similarity boost (0.0 to 1.0).
    pub similarity_boost: f32,
}

impl VoiceSettings {
    /// The fixed narration settings.
    pub const NARRATION: Self = Self {
        stability: 0.5,
        similarity_boost: 0.75,
    };
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self::NARRATION
    }
}

/// Request for synthesizing speech from text.
#[derive(Clone, PartialEq)]
pub struct SpeechRequest {
    /// Credential for the speech service.
    pub api_key: String,
    /// Voice identifier (path parameter).
    pub voice_id: String,
    /// Text to speak.
    pub text: String,
    /// Model identifier.
    pub model_id: String,
    /// Voice tuning.
    pub voice_settings: VoiceSettings,
}

impl SpeechRequest {
    /// Create a request with the default model and narration settings.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        voice_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            voice_id: voice_id.into(),
            text: text.into(),
            model_id: DEFAULT_SPEECH_MODEL.to_owned(),
            voice_settings: VoiceSettings::NARRATION,
        }
    }

    /// Set the model identifier.
    #[must_use]
    pub fn model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

impl std::fmt::Debug for SpeechRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechRequest")
            .field("api_key", &"<redacted>")
            .field("voice_id", &self.voice_id)
            .field("text", &self.text)
            .field("model_id", &self.model_id)
            .field("voice_settings", &self.voice_settings)
            .finish()
    }
}

/// Synthesized audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechResponse {
    /// Raw audio bytes.
    pub audio: Vec<u8>,
    /// MIME type of the audio.
    pub mime_type: String,
}

impl SpeechResponse {
    /// Create a new speech response.
    #[must_use]
    pub fn new(audio: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            audio,
            mime_type: mime_type.into(),
        }
    }
}

/// Trait for providers that support text-to-speech synthesis.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Generate speech from text.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechResponse>;

    /// Get the name of this provider.
    fn provider_name(&self) -> &'static str;

    /// Default model identifier for this provider.
    fn default_model(&self) -> &str {
        DEFAULT_SPEECH_MODEL
    }
}

/// Type alias for an Arc-wrapped `SpeechSynthesizer`.
pub type SharedSpeechSynthesizer = std::sync::Arc<dyn SpeechSynthesizer>;
