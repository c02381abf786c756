//! ElevenLabs client configuration.

use serde::{Deserialize, Serialize};

use crate::speech::DEFAULT_SPEECH_MODEL;

/// Configuration for the ElevenLabs client.
///
/// Holds no credential: the key travels with each [`SpeechRequest`].
///
/// [`SpeechRequest`]: crate::speech::SpeechRequest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElevenLabsConfig {
    /// Base URL for the API.
    pub base_url: String,
    /// Synthesis model identifier.
    pub model_id: String,
    /// Request timeout in seconds; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl ElevenLabsConfig {
    /// Default ElevenLabs API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.elevenlabs.io/v1";

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the synthesis model.
    #[must_use]
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model_id: DEFAULT_SPEECH_MODEL.to_owned(),
            timeout_secs: None,
        }
    }
}
