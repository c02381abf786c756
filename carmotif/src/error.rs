//! Unified error types for carmotif.
//!
//! This module provides the error hierarchy covering:
//! - Remote provider errors (authentication, HTTP status, malformed responses)
//! - Precondition failures reported before any network call
//! - Orchestration outcomes that end an attempt (no image, no variations)

/// Result type alias for carmotif operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for carmotif.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Remote provider error.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A precondition of an orchestration was not met.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// One or more selected files could not be read as images.
    #[error("Could not read one or more of the selected image files.")]
    Upload {
        /// Number of files that failed to decode.
        failed: usize,
        /// Number of files in the batch.
        total: usize,
    },

    /// The image service answered without an inline image.
    #[error("The model did not return an image. Please try again with a different prompt.")]
    NoImage,

    /// The text model returned an empty narration script.
    #[error("Could not generate an audio script.")]
    EmptyScript,

    /// Every variation request failed.
    #[error("Could not generate any variations. Please try again.")]
    NoVariations,

    /// Another orchestration is still in flight.
    #[error("{operation} is already in progress")]
    Busy {
        /// The operation that holds the studio.
        operation: &'static str,
    },

    /// An index did not address an existing entry.
    #[error("No {what} at position {index}")]
    InvalidIndex {
        /// What was being addressed ("image", "variation").
        what: &'static str,
        /// The rejected index.
        index: usize,
    },

    /// A theme or overlay not offered for the current selection.
    #[error("Unknown {kind}: {value}")]
    UnknownOption {
        /// What was being selected ("theme", "overlay").
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check whether this error is a rejected credential.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Provider(err) if err.is_auth())
    }
}

/// Errors raised before an orchestration touches the network.
///
/// Each variant renders the exact user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PreconditionError {
    /// No reference image has been uploaded.
    #[error("Please upload at least one base image first.")]
    NoImages,

    /// Country or theme missing for a primary generation.
    #[error("Please select a country and a theme.")]
    MissingSelection,

    /// Variations requested before any image was generated.
    #[error("Please generate a base customized image first.")]
    NoGeneratedImage,

    /// Reference images were removed after generation.
    #[error("Original car images are missing for reference. Please re-upload.")]
    MissingReferenceImages,

    /// Country or theme missing for a variation run.
    #[error("Please select a country and a theme for variations.")]
    MissingVariationSelection,
}

/// Error type for remote provider operations.
///
/// Each variant represents a distinct failure mode of a collaborator service.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// Authentication or authorization failure.
    #[error("[{provider}] {message}")]
    Auth {
        /// Provider name (e.g., "gemini", "elevenlabs").
        provider: String,
        /// Error description.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("[{provider}] Rate limit exceeded. Please retry after some time.")]
    RateLimited {
        /// Provider name.
        provider: String,
    },

    /// Response did not have the expected shape.
    #[error("Expected {expected}, got {got}")]
    ResponseFormat {
        /// Expected format description.
        expected: String,
        /// Actual format received.
        got: String,
    },

    /// Network or connection error.
    #[error("{0}")]
    Network(String),

    /// HTTP status error with an unstructured body.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Provider-specific error.
    #[error("[{provider}] {message}")]
    Provider {
        /// Provider name.
        provider: String,
        /// Error description.
        message: String,
        /// Optional error code from the provider.
        code: Option<String>,
    },

    /// Internal error.
    #[error("{0}")]
    Internal(String),
}

impl ProviderError {
    /// Create an authentication error.
    #[must_use]
    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a rate limit error.
    #[must_use]
    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
        }
    }

    /// Create a response format error.
    #[must_use]
    pub fn response_format(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::ResponseFormat {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a provider-specific error.
    #[must_use]
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            code: None,
        }
    }

    /// Create a provider error with an error code.
    #[must_use]
    pub fn provider_code(
        provider: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if the provider rejected the credential.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// The error description without the provider tag.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Auth { message, .. } | Self::Provider { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else {
            Self::network(err.to_string())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    mod error {
        use super::*;

        #[test]
        fn upload_renders_aggregate_message() {
            let err = Error::Upload {
                failed: 1,
                total: 3,
            };
            assert_eq!(
                err.to_string(),
                "Could not read one or more of the selected image files."
            );
        }

        #[test]
        fn precondition_is_transparent() {
            let err: Error = PreconditionError::NoImages.into();
            assert_eq!(
                err.to_string(),
                "Please upload at least one base image first."
            );
        }

        #[test]
        fn provider_is_transparent() {
            let err: Error = ProviderError::network("connection reset").into();
            assert_eq!(err.to_string(), "connection reset");
        }

        #[test]
        fn busy_names_operation() {
            let err = Error::Busy {
                operation: "Generation",
            };
            assert!(err.to_string().contains("Generation"));
        }

        #[test]
        fn message_drops_provider_tag() {
            let err = ProviderError::auth("elevenlabs", "Status: 401. Message: Invalid API key");
            assert_eq!(err.to_string(), "[elevenlabs] Status: 401. Message: Invalid API key");
            assert_eq!(err.message(), "Status: 401. Message: Invalid API key");
            let err = ProviderError::provider_code("elevenlabs", "500", "Status: 500. Body: oops");
            assert_eq!(err.message(), "Status: 500. Body: oops");
            assert_eq!(ProviderError::http_status(502, "bad").message(), "HTTP 502: bad");
        }

        #[test]
        fn is_auth_only_for_auth_provider_errors() {
            assert!(Error::from(ProviderError::auth("elevenlabs", "bad key")).is_auth());
            assert!(!Error::from(ProviderError::http_status(500, "boom")).is_auth());
            assert!(!Error::NoImage.is_auth());
        }

        #[test]
        fn from_json_error() {
            let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }

        #[test]
        fn from_io_error() {
            let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
            assert!(matches!(Error::from(io_err), Error::Io(_)));
        }
    }

    mod provider_error {
        use super::*;

        #[test]
        fn auth_displays_provider() {
            let err = ProviderError::auth("gemini", "API key not valid");
            let s = err.to_string();
            assert!(s.contains("[gemini]"));
            assert!(s.contains("API key not valid"));
        }

        #[test]
        fn http_status_displays_code() {
            let err = ProviderError::http_status(503, "unavailable");
            assert_eq!(err.to_string(), "HTTP 503: unavailable");
        }

        #[test]
        fn provider_code_keeps_code() {
            let err = ProviderError::provider_code("gemini", "INVALID_ARGUMENT", "bad part");
            match err {
                ProviderError::Provider { code, .. } => {
                    assert_eq!(code.as_deref(), Some("INVALID_ARGUMENT"));
                }
                _ => panic!("expected provider error"),
            }
        }

        #[test]
        fn rate_limited_is_not_auth() {
            assert!(!ProviderError::rate_limited("gemini").is_auth());
        }
    }
}
