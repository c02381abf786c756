//! Presentation state of the studio.
//!
//! [`ViewState`] captures what a front end renders: which image is on
//! display, the loading context, the error line, the result text and the
//! credential flag. Button state is derived in [`crate::state::AppState`],
//! which knows whether a generated image exists.

/// Which operation holds the loading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingContext {
    /// Primary themed-image generation.
    Generation,
    /// Camera-angle variation generation.
    Variations,
    /// Reading and decoding uploaded files.
    Upload,
}

impl LoadingContext {
    /// Operation name used in busy rejections.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::Generation => "Generation",
            Self::Variations => "Variation generation",
            Self::Upload => "Upload",
        }
    }
}

/// What occupies the main display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Display {
    /// Empty-state placeholder.
    #[default]
    Placeholder,
    /// The first uploaded reference image.
    Uploaded,
    /// The last generated image.
    Generated,
    /// Nothing; a loading indicator is shown instead.
    Hidden,
}

/// Label and enablement of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    /// Visible label.
    pub label: &'static str,
    /// Whether the button accepts clicks.
    pub enabled: bool,
}

impl Button {
    /// Label shown while the button's operation is running.
    pub const BUSY_LABEL: &'static str = "Generating...";
    /// Idle label of the generate button.
    pub const GENERATE_LABEL: &'static str = "Generate";
    /// Idle label of the variations button.
    pub const VARIATIONS_LABEL: &'static str = "Generate Variations";
}

/// Prefix of errors reported by a failed generation.
pub const ERROR_PREFIX: &str = "An error occurred: ";

/// Transient line shown while narration is synthesized.
pub const NARRATION_PENDING: &str = "\nGenerating thematic audio...";

/// Rendered UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub(crate) loading: Option<LoadingContext>,
    pub(crate) display: Display,
    pub(crate) error_message: Option<String>,
    pub(crate) result_text: String,
    pub(crate) credential_invalid: bool,
}

impl ViewState {
    /// Active loading context.
    #[must_use]
    pub const fn loading(&self) -> Option<LoadingContext> {
        self.loading
    }

    /// Whether any operation is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// What the main display shows.
    #[must_use]
    pub const fn display(&self) -> Display {
        self.display
    }

    /// Current error line.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Result text, hidden while loading.
    #[must_use]
    pub fn result_text(&self) -> Option<&str> {
        if self.result_text.is_empty() {
            return None;
        }
        match self.loading {
            Some(LoadingContext::Generation) | None => Some(&self.result_text),
            Some(LoadingContext::Variations | LoadingContext::Upload) => None,
        }
    }

    /// Whether the speech credential input is flagged invalid.
    #[must_use]
    pub const fn credential_invalid(&self) -> bool {
        self.credential_invalid
    }

    /// Enter a loading context: hide the error, the result and the image.
    pub(crate) fn enter_loading(&mut self, context: LoadingContext) {
        self.loading = Some(context);
        self.error_message = None;
        self.display = Display::Hidden;
    }

    /// Leave the loading state, restoring `display` and writing `error`.
    pub(crate) fn exit_loading(&mut self, display: Display, error: Option<String>) {
        self.loading = None;
        self.display = display;
        if error.is_some() {
            self.error_message = error;
        }
    }

    /// Report an error without touching anything else.
    pub(crate) fn report(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Button for `context`: busy label while that context runs.
    pub(crate) fn button(&self, context: LoadingContext, idle: &'static str, ready: bool) -> Button {
        let running = match (self.loading, context) {
            (Some(LoadingContext::Upload), LoadingContext::Generation) => true,
            (Some(active), wanted) => active == wanted,
            (None, _) => false,
        };
        Button {
            label: if running { Button::BUSY_LABEL } else { idle },
            enabled: self.loading.is_none() && ready,
        }
    }
}
