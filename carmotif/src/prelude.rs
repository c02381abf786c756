//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits for easy access.
//!
//! # Usage
//!
//! ```rust,ignore
//! use carmotif::prelude::*;
//! ```

pub use crate::providers::{ElevenLabs, ElevenLabsConfig, Gemini, GeminiConfig};

pub use crate::audio::{AudioClip, AudioSlot};
pub use crate::catalog::{CountryEntry, ThemeEntry};
pub use crate::config::{ConfigIssue, IssueLevel, StudioConfig};
pub use crate::error::{Error, PreconditionError, ProviderError, Result};
pub use crate::generation::{
    ContentGenerator, ContentGeneratorExt, GenerateRequest, GenerateResponse, Modality, Part,
    SharedContentGenerator,
};
pub use crate::image::{ImagePart, Preview, UploadFile, UploadSet};
pub use crate::selection::{Selection, Toggle};
pub use crate::speech::{
    SharedSpeechSynthesizer, SpeechRequest, SpeechResponse, SpeechSynthesizer, VoiceSettings,
};
pub use crate::state::AppState;
pub use crate::studio::{Studio, StudioModels, VARIATION_COUNT};
pub use crate::view::{Button, Display, LoadingContext, ViewState};
