//! Google Gemini API client.
//!
//! This module provides a client for the `generateContent` endpoint,
//! used both for image+text generation and for text-only script writing.

mod client;
mod config;
mod types;

pub use client::Gemini;
pub use config::GeminiConfig;
