//! Application state and its transitions.
//!
//! [`AppState`] is the single owner of everything a session holds: uploads,
//! selection, the last generated image, the variation gallery, narration
//! audio and the rendered view. Orchestrators change it only through the
//! transition methods below; each one states which dependent fields it
//! resets.

use crate::audio::{AudioClip, AudioSlot};
use crate::error::{Error, PreconditionError, Result};
use crate::image::{ImagePart, Preview, UploadSet};
use crate::selection::{Selection, Toggle};
use crate::speech::SpeechResponse;
use crate::view::{
    Button, Display, ERROR_PREFIX, LoadingContext, NARRATION_PENDING, ViewState,
};

/// Inputs captured for a primary generation.
#[derive(Debug, Clone)]
pub(crate) struct GenerationPlan {
    pub country: String,
    pub theme: String,
    pub overlay: Option<String>,
    pub uploads: Vec<ImagePart>,
}

/// Inputs captured for a variation run.
#[derive(Debug, Clone)]
pub(crate) struct VariationPlan {
    pub base: ImagePart,
    pub theme: String,
    pub uploads: Vec<ImagePart>,
}

/// Complete session state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    uploads: UploadSet,
    selection: Selection,
    last_generated: Option<ImagePart>,
    variations: Vec<ImagePart>,
    selected_variation: Option<usize>,
    narrative: String,
    audio: AudioSlot,
    speech_key: Option<String>,
    view: ViewState,
}

impl AppState {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Accessors ---------------------------------------------------------

    /// Uploaded reference images.
    #[must_use]
    pub const fn uploads(&self) -> &UploadSet {
        &self.uploads
    }

    /// Preview entries of the uploads.
    #[must_use]
    pub fn previews(&self) -> Vec<Preview> {
        self.uploads.previews()
    }

    /// Country/theme/overlay selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The most recent primary or selected variation image.
    #[must_use]
    pub const fn last_generated(&self) -> Option<&ImagePart> {
        self.last_generated.as_ref()
    }

    /// Variation gallery entries.
    #[must_use]
    pub fn variations(&self) -> &[ImagePart] {
        &self.variations
    }

    /// Gallery labels, e.g. "Car variation 1".
    #[must_use]
    pub fn variation_labels(&self) -> Vec<String> {
        (1..=self.variations.len())
            .map(|n| format!("Car variation {n}"))
            .collect()
    }

    /// Index of the selected gallery entry.
    #[must_use]
    pub const fn selected_variation(&self) -> Option<usize> {
        self.selected_variation
    }

    /// Whether the variation gallery is shown.
    #[must_use]
    pub fn gallery_visible(&self) -> bool {
        !self.variations.is_empty()
    }

    /// Current narration clip.
    #[must_use]
    pub const fn audio(&self) -> Option<&AudioClip> {
        self.audio.current()
    }

    /// Whether the audio player is shown.
    #[must_use]
    pub const fn audio_visible(&self) -> bool {
        self.audio.is_loaded()
    }

    /// Number of narration clips released so far.
    #[must_use]
    pub const fn audio_released(&self) -> u64 {
        self.audio.released()
    }

    /// Whether a speech credential is held.
    #[must_use]
    pub const fn has_speech_key(&self) -> bool {
        self.speech_key.is_some()
    }

    pub(crate) fn speech_key(&self) -> Option<&str> {
        self.speech_key.as_deref()
    }

    /// Rendered view state.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// The image on the main display, if one is visible.
    #[must_use]
    pub fn displayed_image(&self) -> Option<&ImagePart> {
        match self.view.display {
            Display::Uploaded => self.uploads.first(),
            Display::Generated => self.last_generated.as_ref(),
            Display::Placeholder | Display::Hidden => None,
        }
    }

    /// The generate button.
    #[must_use]
    pub fn generate_button(&self) -> Button {
        self.view
            .button(LoadingContext::Generation, Button::GENERATE_LABEL, true)
    }

    /// The variations button; needs a generated image.
    #[must_use]
    pub fn variations_button(&self) -> Button {
        self.view.button(
            LoadingContext::Variations,
            Button::VARIATIONS_LABEL,
            self.last_generated.is_some(),
        )
    }

    /// Display to restore when leaving a loading state.
    fn resting_display(&self) -> Display {
        if self.last_generated.is_some() {
            Display::Generated
        } else if !self.uploads.is_empty() {
            Display::Uploaded
        } else {
            Display::Placeholder
        }
    }

    // ---- Guard -------------------------------------------------------------

    /// Reject a start while another operation is in flight.
    pub(crate) fn ensure_idle(&self) -> Result<()> {
        match self.view.loading {
            Some(context) => Err(Error::Busy {
                operation: context.operation(),
            }),
            None => Ok(()),
        }
    }

    fn precondition(&mut self, err: PreconditionError) -> Error {
        self.view.report(err.to_string());
        err.into()
    }

    // ---- Selection ---------------------------------------------------------

    /// Change the country; clears theme and overlay when it differs.
    pub fn set_country(&mut self, country: Option<&str>) {
        self.selection.set_country(country);
    }

    /// Toggle a theme; always clears the overlay.
    pub fn toggle_theme(&mut self, theme: &str) -> Result<Toggle> {
        self.selection.toggle_theme(theme)
    }

    /// Toggle an overlay snippet.
    pub fn toggle_overlay(&mut self, overlay: &str) -> Result<Toggle> {
        self.selection.toggle_overlay(overlay)
    }

    /// Replace the speech credential and clear the invalid flag.
    pub fn set_speech_key(&mut self, key: Option<String>) {
        self.speech_key = key
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty());
        self.view.credential_invalid = false;
    }

    // ---- Uploads -----------------------------------------------------------

    pub(crate) fn begin_upload(&mut self) {
        self.view.enter_loading(LoadingContext::Upload);
    }

    /// Install a decoded batch; resets the last generated image, the
    /// gallery and the result text.
    pub(crate) fn finish_upload(&mut self, outcome: &Result<Vec<ImagePart>>) {
        let error = match outcome {
            Ok(images) => {
                self.uploads.replace(images.clone());
                self.last_generated = None;
                self.clear_gallery();
                self.narrative.clear();
                self.view.result_text.clear();
                None
            }
            Err(err) => Some(err.to_string()),
        };
        let display = self.resting_display();
        self.view.exit_loading(display, error);
    }

    /// Remove one upload; generation state is untouched.
    pub fn remove_upload(&mut self, index: usize) -> Result<ImagePart> {
        let removed = self.uploads.remove(index)?;
        if !self.view.is_loading() {
            self.view.display = self.resting_display();
        }
        Ok(removed)
    }

    // ---- Primary generation ------------------------------------------------

    /// Check preconditions and enter the generation loading state.
    ///
    /// Clears the result text, the last generated image, the gallery, the
    /// audio and the credential flag.
    pub(crate) fn begin_generation(&mut self) -> Result<GenerationPlan> {
        self.ensure_idle()?;
        if self.uploads.is_empty() {
            return Err(self.precondition(PreconditionError::NoImages));
        }
        let Some((country, theme)) = self.selection.country_and_theme() else {
            return Err(self.precondition(PreconditionError::MissingSelection));
        };
        let plan = GenerationPlan {
            country: country.to_owned(),
            theme: theme.to_owned(),
            overlay: self.selection.overlay().map(str::to_owned),
            uploads: self.uploads.as_slice().to_vec(),
        };

        self.view.credential_invalid = false;
        self.view.enter_loading(LoadingContext::Generation);
        self.view.result_text.clear();
        self.narrative.clear();
        self.last_generated = None;
        self.clear_gallery();
        self.audio.release();
        Ok(plan)
    }

    /// Show the generated image and its narrative.
    pub(crate) fn primary_succeeded(&mut self, image: ImagePart, narrative: String) {
        self.last_generated = Some(image);
        self.view.display = Display::Generated;
        self.view.result_text.clone_from(&narrative);
        self.narrative = narrative;
    }

    pub(crate) fn narration_started(&mut self) {
        self.view.result_text.push_str(NARRATION_PENDING);
    }

    /// Load the clip and restore the plain narrative.
    pub(crate) fn narration_succeeded(&mut self, speech: SpeechResponse) {
        self.audio.assign(speech);
        self.view.result_text.clone_from(&self.narrative);
    }

    /// Append the failure warning; flag the credential on auth failures.
    pub(crate) fn narration_failed(&mut self, message: &str, auth: bool) {
        self.view.result_text = format!(
            "{}\n\n⚠️ Audio generation failed: {message}",
            self.narrative
        );
        if auth {
            self.view.credential_invalid = true;
        }
    }

    /// Leave the generation loading state.
    pub(crate) fn finish_generation(&mut self, error: Option<&Error>) {
        let display = self.resting_display();
        self.view
            .exit_loading(display, error.map(|e| format!("{ERROR_PREFIX}{e}")));
    }

    // ---- Variations --------------------------------------------------------

    /// Check preconditions and enter the variations loading state.
    pub(crate) fn begin_variations(&mut self) -> Result<VariationPlan> {
        self.ensure_idle()?;
        let Some(base) = self.last_generated.clone() else {
            return Err(self.precondition(PreconditionError::NoGeneratedImage));
        };
        if self.uploads.is_empty() {
            return Err(self.precondition(PreconditionError::MissingReferenceImages));
        }
        let Some((_, theme)) = self.selection.country_and_theme() else {
            return Err(self.precondition(PreconditionError::MissingVariationSelection));
        };
        let plan = VariationPlan {
            base,
            theme: theme.to_owned(),
            uploads: self.uploads.as_slice().to_vec(),
        };

        self.view.enter_loading(LoadingContext::Variations);
        self.clear_gallery();
        Ok(plan)
    }

    /// Populate the gallery and auto-select its first entry.
    pub(crate) fn variations_succeeded(&mut self, images: Vec<ImagePart>) {
        self.last_generated = images.first().cloned();
        self.selected_variation = self.last_generated.as_ref().map(|_| 0);
        self.variations = images;
    }

    /// Leave the variations loading state.
    pub(crate) fn finish_variations(&mut self, error: Option<&Error>) {
        let display = self.resting_display();
        self.view
            .exit_loading(display, error.map(|e| format!("{ERROR_PREFIX}{e}")));
    }

    /// Switch the display and baseline to a gallery entry.
    pub fn select_variation(&mut self, index: usize) -> Result<&ImagePart> {
        let Some(image) = self.variations.get(index) else {
            return Err(Error::InvalidIndex {
                what: "variation",
                index,
            });
        };
        self.last_generated = Some(image.clone());
        self.selected_variation = Some(index);
        if !self.view.is_loading() {
            self.view.display = Display::Generated;
        }
        Ok(image)
    }

    fn clear_gallery(&mut self) {
        self.variations.clear();
        self.selected_variation = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn part(tag: &str) -> ImagePart {
        ImagePart::from_bytes(tag.as_bytes(), "image/png")
    }

    fn ready() -> AppState {
        let mut state = AppState::new();
        state.begin_upload();
        state.finish_upload(&Ok(vec![part("car")]));
        state.set_country(Some("Japan"));
        state.toggle_theme("Shibuya Crossing").unwrap();
        state
    }

    fn generated() -> AppState {
        let mut state = ready();
        state.begin_generation().unwrap();
        state.primary_succeeded(part("gen"), "A story.".into());
        state.finish_generation(None);
        state
    }

    mod uploads {
        use super::*;

        #[test]
        fn upload_shows_first_image() {
            let state = ready();
            assert_eq!(state.view().display(), Display::Uploaded);
            assert_eq!(state.displayed_image(), Some(&part("car")));
            assert_eq!(state.previews()[0].label, "Uploaded car image 1");
        }

        #[test]
        fn upload_resets_generation_state() {
            let mut state = generated();
            state.begin_upload();
            state.finish_upload(&Ok(vec![part("a"), part("b")]));

            assert!(state.last_generated().is_none());
            assert!(state.variations().is_empty());
            assert_eq!(state.view().result_text(), None);
            assert_eq!(state.uploads().len(), 2);
        }

        #[test]
        fn failed_upload_keeps_previous_set() {
            let mut state = ready();
            state.begin_upload();
            state.finish_upload(&Err(Error::Upload { failed: 1, total: 2 }));

            assert_eq!(state.uploads().as_slice(), &[part("car")]);
            assert_eq!(
                state.view().error_message(),
                Some("Could not read one or more of the selected image files.")
            );
            assert_eq!(state.view().display(), Display::Uploaded);
        }

        #[test]
        fn removal_keeps_generation_state() {
            let mut state = generated();
            state.remove_upload(0).unwrap();
            assert_eq!(state.last_generated(), Some(&part("gen")));
            assert_eq!(state.view().display(), Display::Generated);
        }

        #[test]
        fn removing_last_upload_shows_placeholder() {
            let mut state = ready();
            state.remove_upload(0).unwrap();
            assert_eq!(state.view().display(), Display::Placeholder);
            assert!(state.remove_upload(0).is_err());
        }
    }

    mod generation {
        use super::*;

        #[test]
        fn requires_images() {
            let mut state = AppState::new();
            let err = state.begin_generation().unwrap_err();
            assert!(matches!(
                err,
                Error::Precondition(PreconditionError::NoImages)
            ));
            assert_eq!(
                state.view().error_message(),
                Some("Please upload at least one base image first.")
            );
            assert!(!state.view().is_loading());
        }

        #[test]
        fn requires_selection() {
            let mut state = ready();
            state.toggle_theme("Shibuya Crossing").unwrap();
            let err = state.begin_generation().unwrap_err();
            assert!(matches!(
                err,
                Error::Precondition(PreconditionError::MissingSelection)
            ));
        }

        #[test]
        fn begin_clears_previous_results() {
            let mut state = generated();
            state.begin_variations().unwrap();
            state.variations_succeeded(vec![part("v1")]);
            state.finish_variations(None);

            let plan = state.begin_generation().unwrap();
            assert_eq!(plan.country, "Japan");
            assert!(state.last_generated().is_none());
            assert!(!state.gallery_visible());
            assert_eq!(state.view().display(), Display::Hidden);
            assert_eq!(state.generate_button().label, "Generating...");
            assert!(!state.generate_button().enabled);
        }

        #[test]
        fn busy_while_loading() {
            let mut state = ready();
            state.begin_generation().unwrap();
            assert!(matches!(
                state.begin_generation(),
                Err(Error::Busy { .. })
            ));
            assert!(matches!(state.begin_variations(), Err(Error::Busy { .. })));
        }

        #[test]
        fn failure_restores_uploaded_image() {
            let mut state = ready();
            state.begin_generation().unwrap();
            state.finish_generation(Some(&Error::NoImage));

            assert_eq!(state.view().display(), Display::Uploaded);
            assert!(state.last_generated().is_none());
            assert_eq!(
                state.view().error_message(),
                Some(
                    "An error occurred: The model did not return an image. \
                     Please try again with a different prompt."
                )
            );
        }

        #[test]
        fn success_enables_variations() {
            let state = generated();
            assert_eq!(state.displayed_image(), Some(&part("gen")));
            assert_eq!(state.view().result_text(), Some("A story."));
            assert!(state.variations_button().enabled);
        }
    }

    mod narration {
        use super::*;

        #[test]
        fn pending_text_then_restored() {
            let mut state = ready();
            state.begin_generation().unwrap();
            state.primary_succeeded(part("gen"), "Story".into());
            state.narration_started();
            assert_eq!(
                state.view().result_text(),
                Some("Story\nGenerating thematic audio...")
            );

            state.narration_succeeded(SpeechResponse::new(b"mp3".to_vec(), "audio/mpeg"));
            assert_eq!(state.view().result_text(), Some("Story"));
            assert!(state.audio_visible());
        }

        #[test]
        fn failure_appends_warning_and_flags_key() {
            let mut state = ready();
            state.set_speech_key(Some("sk".into()));
            state.begin_generation().unwrap();
            state.primary_succeeded(part("gen"), "Story".into());
            state.narration_started();
            state.narration_failed("Status: 401.", true);

            assert_eq!(
                state.view().result_text(),
                Some("Story\n\n⚠️ Audio generation failed: Status: 401.")
            );
            assert!(state.view().credential_invalid());
            assert_eq!(state.last_generated(), Some(&part("gen")));
        }

        #[test]
        fn new_generation_releases_audio_and_clears_flag() {
            let mut state = ready();
            state.begin_generation().unwrap();
            state.primary_succeeded(part("gen"), "Story".into());
            state.narration_succeeded(SpeechResponse::new(b"mp3".to_vec(), "audio/mpeg"));
            state.narration_failed("x", true);
            state.finish_generation(None);

            state.begin_generation().unwrap();
            assert!(!state.audio_visible());
            assert_eq!(state.audio_released(), 1);
            assert!(!state.view().credential_invalid());
        }

        #[test]
        fn blank_key_is_no_key() {
            let mut state = AppState::new();
            state.set_speech_key(Some("   ".into()));
            assert!(!state.has_speech_key());
        }
    }

    mod variations {
        use super::*;

        #[test]
        fn requires_generated_image() {
            let mut state = ready();
            let err = state.begin_variations().unwrap_err();
            assert!(matches!(
                err,
                Error::Precondition(PreconditionError::NoGeneratedImage)
            ));
        }

        #[test]
        fn requires_reference_images() {
            let mut state = generated();
            state.remove_upload(0).unwrap();
            let err = state.begin_variations().unwrap_err();
            assert!(matches!(
                err,
                Error::Precondition(PreconditionError::MissingReferenceImages)
            ));
        }

        #[test]
        fn requires_selection() {
            let mut state = generated();
            state.set_country(None);
            let err = state.begin_variations().unwrap_err();
            assert!(matches!(
                err,
                Error::Precondition(PreconditionError::MissingVariationSelection)
            ));
        }

        #[test]
        fn success_selects_first() {
            let mut state = generated();
            let plan = state.begin_variations().unwrap();
            assert_eq!(plan.base, part("gen"));
            assert_eq!(state.variations_button().label, "Generating...");

            state.variations_succeeded(vec![part("v1"), part("v2")]);
            state.finish_variations(None);

            assert_eq!(state.variations().len(), 2);
            assert_eq!(state.selected_variation(), Some(0));
            assert_eq!(state.last_generated(), Some(&part("v1")));
            assert_eq!(state.displayed_image(), Some(&part("v1")));
            assert_eq!(state.variation_labels(), vec!["Car variation 1", "Car variation 2"]);
        }

        #[test]
        fn total_failure_hides_gallery() {
            let mut state = generated();
            state.begin_variations().unwrap();
            state.finish_variations(Some(&Error::NoVariations));

            assert!(!state.gallery_visible());
            assert_eq!(state.last_generated(), Some(&part("gen")));
            assert_eq!(
                state.view().error_message(),
                Some("An error occurred: Could not generate any variations. Please try again.")
            );
        }

        #[test]
        fn select_switches_baseline() {
            let mut state = generated();
            state.begin_variations().unwrap();
            state.variations_succeeded(vec![part("v1"), part("v2")]);
            state.finish_variations(None);

            state.select_variation(1).unwrap();
            assert_eq!(state.last_generated(), Some(&part("v2")));
            assert_eq!(state.selected_variation(), Some(1));
            assert!(state.select_variation(2).is_err());
            assert_eq!(state.selected_variation(), Some(1));
        }
    }
}
