//! Configuration management for carmotif.
//!
//! Settings are layered:
//! 1. Default values
//! 2. Config file (`--config`, `CARMOTIF_CONFIG`, or `~/.carmotif/config.toml`)
//! 3. Environment variables
//!
//! Credentials never live in the file. The image-generation key comes from
//! the environment; the speech key is entered at runtime.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::providers::{ElevenLabsConfig, GeminiConfig};
use crate::studio::StudioModels;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CARMOTIF_CONFIG";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Image and text generation service.
    pub gemini: GeminiConfig,
    /// Speech synthesis service.
    pub elevenlabs: ElevenLabsConfig,
}

impl StudioConfig {
    /// Load the file at `explicit`, else the resolved default, then apply
    /// the environment.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = resolve_path(explicit);
        Ok(Self::load_from(&path).await?.with_env())
    }

    /// Load a config file; a missing file yields defaults.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Save to `path`, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, self.to_toml()?).await?;
        info!(path = %path.display(), "saved config file");
        Ok(())
    }

    /// Write a default config file; an existing one is kept unless `force`.
    ///
    /// Returns whether a file was written.
    pub async fn init(path: &Path, force: bool) -> Result<bool> {
        if !force && tokio::fs::try_exists(path).await? {
            debug!(path = %path.display(), "config file exists, not overwriting");
            return Ok(false);
        }
        Self::default().save_to(path).await?;
        Ok(true)
    }

    /// Merge environment variables into the configuration.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        self.gemini.apply_env();
        self
    }

    /// Model identifiers for the studio.
    #[must_use]
    pub fn models(&self) -> StudioModels {
        StudioModels {
            image_model: self.gemini.image_model.clone(),
            text_model: self.gemini.text_model.clone(),
            speech_model: self.elevenlabs.model_id.clone(),
        }
    }

    /// Check the configuration for problems.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.gemini.api_key.is_empty() {
            issues.push(ConfigIssue::error(
                "gemini.api_key",
                "No image-generation key. Set GEMINI_API_KEY (or API_KEY).",
            ));
        }

        for (path, url) in [
            ("gemini.base_url", &self.gemini.base_url),
            ("elevenlabs.base_url", &self.elevenlabs.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                issues.push(ConfigIssue::error(path, format!("Not an HTTP URL: {url}")));
            }
        }

        for (path, model) in [
            ("gemini.image_model", &self.gemini.image_model),
            ("gemini.text_model", &self.gemini.text_model),
            ("elevenlabs.model_id", &self.elevenlabs.model_id),
        ] {
            if model.trim().is_empty() {
                issues.push(ConfigIssue::error(path, "Model must not be empty"));
            }
        }

        for (path, timeout) in [
            ("gemini.timeout_secs", self.gemini.timeout_secs),
            ("elevenlabs.timeout_secs", self.elevenlabs.timeout_secs),
        ] {
            if timeout == Some(0) {
                issues.push(ConfigIssue::warning(
                    path,
                    "Timeout is 0, requests will time out immediately",
                ));
            }
        }

        issues
    }

    /// Check if the configuration is valid (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate()
            .iter()
            .all(|issue| issue.level != IssueLevel::Error)
    }
}

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".carmotif")
}

/// Get the default config file path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Resolve the config file: explicit path, then `CARMOTIF_CONFIG`, then the
/// default location.
#[must_use]
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// The configuration cannot be used.
    Error,
    /// The configuration works but is likely wrong.
    Warning,
}

/// A configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Issue severity level.
    pub level: IssueLevel,
    /// Configuration path (e.g., "gemini.base_url").
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl ConfigIssue {
    /// Create an error-level issue.
    #[must_use]
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    #[must_use]
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            IssueLevel::Error => "ERROR",
            IssueLevel::Warning => "WARN",
        };
        write!(f, "[{}] {}: {}", prefix, self.path, self.message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_default_paths() {
        assert!(default_config_dir().ends_with(".carmotif"));
        assert!(default_config_path().ends_with("config.toml"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("/tmp/custom.toml");
        assert_eq!(resolve_path(Some(path)), PathBuf::from("/tmp/custom.toml"));
    }

    #[test]
    fn test_partial_file() {
        let config = StudioConfig::from_toml(
            r#"
            [gemini]
            text_model = "gemini-2.0-flash"

            [elevenlabs]
            timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.gemini.text_model, "gemini-2.0-flash");
        assert_eq!(config.gemini.image_model, GeminiConfig::DEFAULT_IMAGE_MODEL);
        assert_eq!(config.elevenlabs.timeout_secs, Some(30));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(StudioConfig::from_toml("[gemini]\nmodel = \"x\"").is_err());
        assert!(StudioConfig::from_toml("[speech]\nkey = \"x\"").is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = StudioConfig::default();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.path == "gemini.api_key"));
        assert!(!config.is_valid());

        config.gemini.api_key = "key".into();
        config.elevenlabs.timeout_secs = Some(0);
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].level, IssueLevel::Warning);
        assert!(config.is_valid());
        assert_eq!(
            issues[0].to_string(),
            "[WARN] elevenlabs.timeout_secs: Timeout is 0, requests will time out immediately"
        );
    }

    #[test]
    fn test_models() {
        let models = StudioConfig::default().models();
        assert_eq!(models.image_model, "gemini-2.5-flash-image-preview");
        assert_eq!(models.text_model, "gemini-2.5-flash");
        assert_eq!(models.speech_model, "eleven_multilingual_v2");
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = StudioConfig::load_from(&temp.path().join("absent.toml"))
            .await
            .unwrap();
        assert_eq!(config.gemini.base_url, GeminiConfig::DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_init_and_reload() {
        let temp = assert_fs::TempDir::new().unwrap();
        let path = temp.child("nested/config.toml");

        assert!(StudioConfig::init(path.path(), false).await.unwrap());
        let written = std::fs::read_to_string(path.path()).unwrap();
        assert!(written.contains("[gemini]"));
        assert!(!written.contains("api_key"));
        assert!(!StudioConfig::init(path.path(), false).await.unwrap());
        assert!(StudioConfig::init(path.path(), true).await.unwrap());

        let config = StudioConfig::load_from(path.path()).await.unwrap();
        assert_eq!(config.elevenlabs.base_url, ElevenLabsConfig::DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_invalid_file_names_path() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("bad.toml");
        file.write_str("[gemini\n").unwrap();

        let err = StudioConfig::load_from(file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("bad.toml"));
    }
}
