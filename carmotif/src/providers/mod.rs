//! Remote service backends.
//!
//! # Available Backends
//!
//! - [`gemini`] - Google Gemini (image+text generation, text-only scripts)
//! - [`elevenlabs`] - ElevenLabs speech synthesis
//! - [`mock`] - scripted in-memory backends for tests and offline runs

pub mod elevenlabs;
pub mod gemini;
pub mod mock;

pub use elevenlabs::{ElevenLabs, ElevenLabsConfig};
pub use gemini::{Gemini, GeminiConfig};
