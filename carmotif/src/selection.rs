//! Country, theme and overlay selection.
//!
//! The selection is a small state machine over the static catalog:
//! a theme is only valid for the current country and an overlay only for the
//! current `(country, theme)` pair. Every transition clears exactly the
//! dependent levels below the one it changes.

use crate::catalog;
use crate::error::{Error, Result};

/// Outcome of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The option is now selected.
    Selected,
    /// The option was already selected and is now cleared.
    Deselected,
}

/// Current selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    country: Option<String>,
    theme: Option<String>,
    overlay: Option<String>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            country: None,
            theme: None,
            overlay: None,
        }
    }

    /// Selected country.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Selected theme.
    #[must_use]
    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// Selected overlay snippet.
    #[must_use]
    pub fn overlay(&self) -> Option<&str> {
        self.overlay.as_deref()
    }

    /// Country and theme when both are selected.
    #[must_use]
    pub fn country_and_theme(&self) -> Option<(&str, &str)> {
        Some((self.country.as_deref()?, self.theme.as_deref()?))
    }

    /// Change the country.
    ///
    /// Picking a different country (or clearing it) drops theme and overlay.
    /// Re-picking the current country is not a change and keeps them.
    pub fn set_country(&mut self, country: Option<&str>) {
        let country = country.filter(|c| !c.is_empty());
        if self.country.as_deref() == country {
            return;
        }
        self.country = country.map(str::to_owned);
        self.theme = None;
        self.overlay = None;
    }

    /// Toggle a theme of the current country.
    ///
    /// Any theme change, including deselection, clears the overlay.
    pub fn toggle_theme(&mut self, theme: &str) -> Result<Toggle> {
        if !self.available_themes().iter().any(|t| *t == theme) {
            return Err(Error::UnknownOption {
                kind: "theme",
                value: theme.to_owned(),
            });
        }

        self.overlay = None;
        if self.theme.as_deref() == Some(theme) {
            self.theme = None;
            Ok(Toggle::Deselected)
        } else {
            self.theme = Some(theme.to_owned());
            Ok(Toggle::Selected)
        }
    }

    /// Toggle an overlay snippet of the current theme.
    pub fn toggle_overlay(&mut self, overlay: &str) -> Result<Toggle> {
        if !self.available_overlays().iter().any(|o| *o == overlay) {
            return Err(Error::UnknownOption {
                kind: "overlay",
                value: overlay.to_owned(),
            });
        }

        if self.overlay.as_deref() == Some(overlay) {
            self.overlay = None;
            Ok(Toggle::Deselected)
        } else {
            self.overlay = Some(overlay.to_owned());
            Ok(Toggle::Selected)
        }
    }

    /// Themes offered for the current country.
    #[must_use]
    pub fn available_themes(&self) -> Vec<&'static str> {
        self.country.as_deref().map(catalog::themes).unwrap_or_default()
    }

    /// Overlays offered for the current `(country, theme)` pair.
    #[must_use]
    pub fn available_overlays(&self) -> &'static [&'static str] {
        self.country_and_theme()
            .map(|(country, theme)| catalog::overlays(country, theme))
            .unwrap_or(&[])
    }

    /// Whether the theme selector is shown.
    #[must_use]
    pub fn theme_selector_visible(&self) -> bool {
        !self.available_themes().is_empty()
    }

    /// Whether the overlay selector is shown.
    #[must_use]
    pub fn overlay_selector_visible(&self) -> bool {
        !self.available_overlays().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn japan_shibuya() -> Selection {
        let mut s = Selection::new();
        s.set_country(Some("Japan"));
        s.toggle_theme("Shibuya Crossing").unwrap();
        s
    }

    #[test]
    fn country_change_clears_theme_and_overlay() {
        let mut s = japan_shibuya();
        s.toggle_overlay("Tokyo Rush").unwrap();

        s.set_country(Some("Italy"));
        assert_eq!(s.country(), Some("Italy"));
        assert_eq!(s.theme(), None);
        assert_eq!(s.overlay(), None);
    }

    #[test]
    fn country_change_clears_theme_without_overlay() {
        let mut s = japan_shibuya();
        s.set_country(None);
        assert_eq!(s.country(), None);
        assert_eq!(s.theme(), None);
        assert!(!s.theme_selector_visible());
    }

    #[test]
    fn same_country_is_not_a_change() {
        let mut s = japan_shibuya();
        s.set_country(Some("Japan"));
        assert_eq!(s.theme(), Some("Shibuya Crossing"));
    }

    #[test]
    fn theme_double_toggle_is_identity() {
        let mut s = Selection::new();
        s.set_country(Some("USA"));
        let before = s.clone();

        assert_eq!(s.toggle_theme("Route 66").unwrap(), Toggle::Selected);
        assert_eq!(s.toggle_theme("Route 66").unwrap(), Toggle::Deselected);
        assert_eq!(s, before);
    }

    #[test]
    fn new_theme_clears_overlay() {
        let mut s = japan_shibuya();
        s.toggle_overlay("Urban Flow").unwrap();

        s.toggle_theme("Kyoto Bamboo Forest").unwrap();
        assert_eq!(s.theme(), Some("Kyoto Bamboo Forest"));
        assert_eq!(s.overlay(), None);
        assert_eq!(s.country(), Some("Japan"));
    }

    #[test]
    fn overlay_toggle_and_replace() {
        let mut s = japan_shibuya();
        assert_eq!(s.toggle_overlay("Urban Flow").unwrap(), Toggle::Selected);
        assert_eq!(s.toggle_overlay("Tokyo Rush").unwrap(), Toggle::Selected);
        assert_eq!(s.overlay(), Some("Tokyo Rush"));
        assert_eq!(s.toggle_overlay("Tokyo Rush").unwrap(), Toggle::Deselected);
        assert_eq!(s.overlay(), None);
    }

    #[test]
    fn theme_of_other_country_rejected() {
        let mut s = japan_shibuya();
        let err = s.toggle_theme("Route 66").unwrap_err();
        assert!(matches!(err, Error::UnknownOption { kind: "theme", .. }));
        assert_eq!(s.theme(), Some("Shibuya Crossing"));
    }

    #[test]
    fn overlay_without_theme_rejected() {
        let mut s = Selection::new();
        s.set_country(Some("Japan"));
        assert!(s.toggle_overlay("Tokyo Rush").is_err());
        assert!(!s.overlay_selector_visible());
    }

    #[test]
    fn unsupported_country_hides_theme_selector() {
        let mut s = Selection::new();
        s.set_country(Some("France"));
        assert!(!s.theme_selector_visible());
        assert!(s.available_themes().is_empty());
    }

    #[test]
    fn overlay_selector_follows_theme() {
        let s = japan_shibuya();
        assert!(s.overlay_selector_visible());
        assert_eq!(s.available_overlays().len(), 3);
    }
}
