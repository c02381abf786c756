//! ElevenLabs text-to-speech client.

mod client;
mod config;
mod types;

pub use client::ElevenLabs;
pub use config::ElevenLabsConfig;
