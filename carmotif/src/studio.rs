//! The studio: orchestration of uploads, generation, narration and
//! variations over a shared [`AppState`].
//!
//! A [`Studio`] is cheap to clone; clones share one session. The state lock
//! is held only for the synchronous transitions, never across a network
//! call, so a front end can read a [`Studio::snapshot`] while a generation
//! is pending. Overlapping starts are rejected with [`Error::Busy`].
//!
//! # Example
//!
//! ```rust,ignore
//! use carmotif::prelude::*;
//!
//! let studio = Studio::from_config(&StudioConfig::load(None)?)?;
//! studio.ingest_paths(&["car.jpg".into()]).await?;
//! studio.set_country(Some("Japan")).await;
//! studio.toggle_theme("Shibuya Crossing").await?;
//! studio.generate().await?;
//! studio.generate_variations().await?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::catalog;
use crate::config::StudioConfig;
use crate::error::{Error, Result};
use crate::generation::{
    ContentGeneratorExt, GenerateRequest, Modality, SharedContentGenerator,
};
use crate::image::{self, ImagePart, UploadFile};
use crate::prompt;
use crate::providers::{ElevenLabs, Gemini};
use crate::selection::Toggle;
use crate::speech::{SharedSpeechSynthesizer, SpeechRequest, SpeechResponse};
use crate::state::{AppState, GenerationPlan, VariationPlan};

/// Number of camera-angle variations requested per run.
pub const VARIATION_COUNT: usize = 3;

/// Model identifiers used by the studio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioModels {
    /// Image+text model for primary and variation generation.
    pub image_model: String,
    /// Text model for narration scripts.
    pub text_model: String,
    /// Speech synthesis model.
    pub speech_model: String,
}

impl Default for StudioModels {
    fn default() -> Self {
        let config = StudioConfig::default();
        config.models()
    }
}

struct Inner {
    generator: SharedContentGenerator,
    speech: SharedSpeechSynthesizer,
    models: StudioModels,
    state: Mutex<AppState>,
}

/// Orchestrator of one studio session.
#[derive(Clone)]
pub struct Studio {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("generator", &self.inner.generator.provider_name())
            .field("speech", &self.inner.speech.provider_name())
            .field("models", &self.inner.models)
            .finish_non_exhaustive()
    }
}

impl Studio {
    /// Create a studio over the given providers.
    #[must_use]
    pub fn new(
        generator: SharedContentGenerator,
        speech: SharedSpeechSynthesizer,
        models: StudioModels,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                generator,
                speech,
                models,
                state: Mutex::new(AppState::new()),
            }),
        }
    }

    /// Create a studio backed by Gemini and ElevenLabs.
    pub fn from_config(config: &StudioConfig) -> Result<Self> {
        let generator = Gemini::new(config.gemini.clone())?;
        let speech = ElevenLabs::new(config.elevenlabs.clone())?;
        Ok(Self::new(
            Arc::new(generator),
            Arc::new(speech),
            config.models(),
        ))
    }

    /// Model identifiers in use.
    #[must_use]
    pub fn models(&self) -> &StudioModels {
        &self.inner.models
    }

    async fn state(&self) -> MutexGuard<'_, AppState> {
        self.inner.state.lock().await
    }

    /// A copy of the full session state.
    pub async fn snapshot(&self) -> AppState {
        self.state().await.clone()
    }

    // ---------- Selection ----------

    /// Change the country.
    pub async fn set_country(&self, country: Option<&str>) {
        self.state().await.set_country(country);
    }

    /// Toggle a theme of the current country.
    pub async fn toggle_theme(&self, theme: &str) -> Result<Toggle> {
        self.state().await.toggle_theme(theme)
    }

    /// Toggle an overlay snippet of the current theme.
    pub async fn toggle_overlay(&self, overlay: &str) -> Result<Toggle> {
        self.state().await.toggle_overlay(overlay)
    }

    /// Replace the in-memory speech credential.
    pub async fn set_speech_key(&self, key: Option<String>) {
        self.state().await.set_speech_key(key);
    }

    // ---------- Uploads ----------

    /// Read, decode and install image files from disk.
    ///
    /// Returns the number of images now uploaded. An empty selection is
    /// ignored.
    pub async fn ingest_paths(&self, paths: &[PathBuf]) -> Result<usize> {
        if paths.is_empty() {
            return Ok(0);
        }
        self.begin_upload().await?;
        let outcome = image::ingest_paths(paths).await;
        self.finish_upload(outcome).await
    }

    /// Decode and install already-read files.
    pub async fn ingest_files(&self, files: Vec<UploadFile>) -> Result<usize> {
        if files.is_empty() {
            return Ok(0);
        }
        self.begin_upload().await?;
        let outcome = image::decode_batch(files);
        self.finish_upload(outcome).await
    }

    async fn begin_upload(&self) -> Result<()> {
        let mut state = self.state().await;
        state.ensure_idle()?;
        state.begin_upload();
        Ok(())
    }

    async fn finish_upload(&self, outcome: Result<Vec<ImagePart>>) -> Result<usize> {
        let mut state = self.state().await;
        state.finish_upload(&outcome);
        let images = outcome?;
        info!(count = images.len(), "Uploaded reference images");
        Ok(images.len())
    }

    /// Remove one uploaded image.
    pub async fn remove_image(&self, index: usize) -> Result<()> {
        self.state().await.remove_upload(index)?;
        debug!(index, "Removed uploaded image");
        Ok(())
    }

    // ---------- Primary generation ----------

    /// Generate the themed image, then attempt narration.
    ///
    /// Narration failures never fail this call; they are appended to the
    /// result text.
    pub async fn generate(&self) -> Result<()> {
        let plan = self.state().await.begin_generation()?;
        info!(country = %plan.country, theme = %plan.theme, "Starting generation");

        match self.render_scene(&plan).await {
            Ok((image, narrative)) => {
                self.state().await.primary_succeeded(image, narrative);
            }
            Err(err) => {
                error!(error = %err, "Generation failed");
                self.state().await.finish_generation(Some(&err));
                return Err(err);
            }
        }

        self.narrate(&plan.country, &plan.theme).await;
        self.state().await.finish_generation(None);
        info!("Generation finished");
        Ok(())
    }

    async fn render_scene(&self, plan: &GenerationPlan) -> Result<(ImagePart, String)> {
        let request = GenerateRequest::new(&self.inner.models.image_model)
            .images(&plan.uploads)
            .text(prompt::scene_prompt(
                &plan.country,
                &plan.theme,
                plan.overlay.as_deref(),
            ))
            .modalities([Modality::Image, Modality::Text]);

        let response = self.inner.generator.generate(&request).await?;
        match response.into_image_and_text() {
            (Some(image), text) => Ok((image, text.unwrap_or_default())),
            (None, _) => Err(Error::NoImage),
        }
    }

    async fn narrate(&self, country: &str, theme: &str) {
        let key = {
            let mut state = self.state().await;
            let Some(key) = state.speech_key().map(str::to_owned) else {
                warn!("Speech credential not provided, skipping narration");
                return;
            };
            state.narration_started();
            key
        };

        let outcome = match self.write_script(country, theme).await {
            Ok(script) => self.speak(key, country, script).await,
            Err(err) => Err(NarrationFailure::Script(err)),
        };

        match outcome {
            Ok(speech) => self.state().await.narration_succeeded(speech),
            Err(failure) => {
                let err = failure.error();
                error!(error = %err, "Audio generation failed");
                self.state()
                    .await
                    .narration_failed(&narration_message(err), failure.rejects_key());
            }
        }
    }

    async fn write_script(&self, country: &str, theme: &str) -> Result<String> {
        let script = self
            .inner
            .generator
            .complete(
                &self.inner.models.text_model,
                &prompt::narration_prompt(country, theme),
            )
            .await?;
        let script = script.trim();
        if script.is_empty() {
            return Err(Error::EmptyScript);
        }
        Ok(script.to_owned())
    }

    async fn speak(
        &self,
        key: String,
        country: &str,
        script: String,
    ) -> std::result::Result<SpeechResponse, NarrationFailure> {
        let voice_id = catalog::voice_for(country);
        debug!(voice_id, words = script.split_whitespace().count(), "Synthesizing narration");
        let request =
            SpeechRequest::new(key, voice_id, script).model(&self.inner.models.speech_model);
        self.inner
            .speech
            .synthesize(&request)
            .await
            .map_err(NarrationFailure::Speech)
    }

    // ---------- Variations ----------

    /// Generate camera-angle variations of the last generated image.
    ///
    /// Returns the number of variations that succeeded. Individual failures
    /// are logged; the call fails only when none succeed.
    pub async fn generate_variations(&self) -> Result<usize> {
        let plan = self.state().await.begin_variations()?;
        info!(theme = %plan.theme, "Starting variation generation");

        let images = self.fan_out(&plan).await;
        let mut state = self.state().await;
        if images.is_empty() {
            let err = Error::NoVariations;
            error!(error = %err, "All variations failed");
            state.finish_variations(Some(&err));
            return Err(err);
        }

        let count = images.len();
        state.variations_succeeded(images);
        state.finish_variations(None);
        info!(count, "Variation generation finished");
        Ok(count)
    }

    async fn fan_out(&self, plan: &VariationPlan) -> Vec<ImagePart> {
        let requests: Vec<GenerateRequest> = (0..VARIATION_COUNT)
            .map(|index| {
                GenerateRequest::new(&self.inner.models.image_model)
                    .image(plan.base.clone())
                    .images(&plan.uploads)
                    .text(prompt::variation_prompt(
                        &plan.theme,
                        prompt::camera_angle(index),
                    ))
                    .modalities([Modality::Image])
            })
            .collect();

        let results = join_all(
            requests
                .iter()
                .map(|request| self.inner.generator.generate(request)),
        )
        .await;

        results
            .into_iter()
            .enumerate()
            .filter_map(|(index, result)| match result {
                Ok(response) => {
                    let image = response.first_image().cloned();
                    if image.is_none() {
                        error!(index, "A variation returned no image");
                    }
                    image
                }
                Err(err) => {
                    error!(index, error = %err, "A variation generation failed");
                    None
                }
            })
            .collect()
    }

    /// Show a gallery entry and make it the new baseline.
    pub async fn select_variation(&self, index: usize) -> Result<()> {
        self.state().await.select_variation(index)?;
        debug!(index, "Selected variation");
        Ok(())
    }
}

/// Which narration step failed.
enum NarrationFailure {
    /// Writing the voice-over script.
    Script(Error),
    /// Synthesizing speech.
    Speech(Error),
}

impl NarrationFailure {
    const fn error(&self) -> &Error {
        match self {
            Self::Script(err) | Self::Speech(err) => err,
        }
    }

    /// Only the speech service judges the speech key.
    const fn rejects_key(&self) -> bool {
        matches!(self, Self::Speech(err) if err.is_auth())
    }
}

/// Warning text for a failed narration, without the provider tag.
fn narration_message(err: &Error) -> String {
    match err {
        Error::Provider(provider) => provider.message(),
        other => other.to_string(),
    }
}
