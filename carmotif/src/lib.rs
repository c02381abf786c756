//! Carmotif - car-theme promotional image and narration studio
//!
//! This crate orchestrates a multimodal image model and a speech service to
//! restage uploaded car photos in a country's cultural scenery, narrate the
//! result, and fan out camera-angle variations.

pub mod audio;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generation;
pub mod image;
pub mod prelude;
pub mod prompt;
pub mod providers;
pub mod selection;
pub mod speech;
pub mod state;
pub mod studio;
pub mod view;

pub use error::{Error, PreconditionError, ProviderError, Result};
pub use studio::{Studio, StudioModels};
