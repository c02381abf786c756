//! Error type for the carmotif CLI.

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from the studio library.
    #[error(transparent)]
    Studio(#[from] carmotif::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A studio command could not be understood.
    #[error("{0}")]
    Usage(String),

    /// Nothing is available to export.
    #[error("Nothing to export: {0}")]
    NothingToExport(&'static str),

    /// A stored image could not be decoded.
    #[error("Could not decode image data: {0}")]
    Decode(String),
}

impl CliError {
    /// Create a usage error.
    #[must_use]
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }
}
