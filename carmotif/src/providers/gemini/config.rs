//! Gemini client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

/// Configuration for the Gemini client.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key; supplied through the environment, never the config file.
    #[serde(skip)]
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Model used for image+text generation.
    pub image_model: String,
    /// Model used for text-only requests.
    pub text_model: String,
    /// Request timeout in seconds; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl GeminiConfig {
    /// Default Gemini API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";
    /// Default image+text model.
    pub const DEFAULT_IMAGE_MODEL: &'static str = "gemini-2.5-flash-image-preview";
    /// Default text model.
    pub const DEFAULT_TEXT_MODEL: &'static str = "gemini-2.5-flash";

    /// Creates a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `GEMINI_API_KEY` (falling back to `API_KEY`) - Required API key
    /// - `GEMINI_BASE_URL` - Optional base URL
    /// - `CARMOTIF_IMAGE_MODEL` - Optional image model
    /// - `CARMOTIF_TEXT_MODEL` - Optional text model
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        if config.api_key.is_empty() {
            return Err(
                ProviderError::auth("gemini", "GEMINI_API_KEY environment variable not set").into(),
            );
        }
        Ok(config)
    }

    /// Overlay environment variables onto this configuration.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY").or_else(|_| std::env::var("API_KEY")) {
            self.api_key = key;
        }
        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(model) = std::env::var("CARMOTIF_IMAGE_MODEL") {
            self.image_model = model;
        }
        if let Ok(model) = std::env::var("CARMOTIF_TEXT_MODEL") {
            self.text_model = model;
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the image model.
    #[must_use]
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Sets the text model.
    #[must_use]
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            image_model: Self::DEFAULT_IMAGE_MODEL.to_owned(),
            text_model: Self::DEFAULT_TEXT_MODEL.to_owned(),
            timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("text_model", &self.text_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
