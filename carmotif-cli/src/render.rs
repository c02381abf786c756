//! Plain-text rendering of studio state and the catalog.

use std::fmt::Write as _;

use carmotif::catalog;
use carmotif::prelude::*;

/// Render the session state as the studio `status` block.
#[must_use]
pub fn status(state: &AppState) -> String {
    let mut out = String::new();
    let view = state.view();
    let selection = state.selection();

    let _ = writeln!(out, "Selection:");
    let _ = writeln!(out, "  Country: {}", selection.country().unwrap_or("-"));
    let _ = writeln!(out, "  Theme:   {}", selection.theme().unwrap_or("-"));
    let _ = writeln!(out, "  Overlay: {}", selection.overlay().unwrap_or("-"));

    let _ = writeln!(out, "Uploads:");
    let previews = state.previews();
    if previews.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for preview in previews {
        let _ = writeln!(
            out,
            "  {}. {} ({}, {})",
            preview.index + 1,
            preview.label,
            preview.mime_type,
            bytes(preview.size)
        );
    }

    let _ = writeln!(out, "Display: {}", display(state));
    if let Some(context) = view.loading() {
        let _ = writeln!(out, "Loading: {}", context.operation());
    }

    let labels = state.variation_labels();
    if state.gallery_visible() {
        let _ = writeln!(out, "Variations:");
        for (index, label) in labels.iter().enumerate() {
            let marker = if state.selected_variation() == Some(index) {
                '*'
            } else {
                ' '
            };
            let _ = writeln!(out, " {marker}{}. {label}", index + 1);
        }
    }

    if let Some(clip) = state.audio().filter(|_| state.audio_visible()) {
        let _ = writeln!(out, "Audio: {} ({})", clip.mime_type(), bytes(clip.len()));
    }

    let speech = match (state.has_speech_key(), view.credential_invalid()) {
        (_, true) => "rejected, enter a new key",
        (true, false) => "set",
        (false, false) => "not set, narration is skipped",
    };
    let _ = writeln!(out, "Speech key: {speech}");

    let _ = writeln!(
        out,
        "Buttons: {} | {}",
        button(state.generate_button()),
        button(state.variations_button())
    );

    if let Some(text) = view.result_text().filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "\n{text}");
    }
    if let Some(message) = view.error_message() {
        let _ = writeln!(out, "\n{message}");
    }

    out.trim_end().to_owned()
}

fn display(state: &AppState) -> String {
    let view = state.view();
    match view.display() {
        Display::Placeholder => "empty".to_owned(),
        Display::Hidden => "loading...".to_owned(),
        Display::Uploaded | Display::Generated => state.displayed_image().map_or_else(
            || "empty".to_owned(),
            |image| {
                let source = if view.display() == Display::Generated {
                    "generated image"
                } else {
                    "first upload"
                };
                format!("{source} ({}, {})", image.mime_type, bytes(image.decoded_len()))
            },
        ),
    }
}

fn button(button: Button) -> String {
    if button.enabled {
        format!("[{}]", button.label)
    } else {
        format!("({})", button.label)
    }
}

fn bytes(size: usize) -> String {
    if size >= 1024 * 1024 {
        format!("{:.1} MiB", size as f64 / (1024.0 * 1024.0))
    } else if size >= 1024 {
        format!("{:.1} KiB", size as f64 / 1024.0)
    } else {
        format!("{size} B")
    }
}

/// Render the catalog, optionally narrowed to a country and theme.
pub fn catalog(country: Option<&str>, theme: Option<&str>) -> std::result::Result<String, String> {
    let mut out = String::new();

    let Some(country) = country else {
        for entry in catalog::COUNTRIES {
            let _ = writeln!(out, "{} ({} narration)", entry.name, entry.language);
            for theme in entry.themes {
                let _ = writeln!(out, "  - {}", theme.name);
            }
        }
        return Ok(out.trim_end().to_owned());
    };

    let name = canonical(&catalog::countries(), country)
        .ok_or_else(|| format!("Unknown country '{country}'"))?;
    let themes = catalog::themes(name);

    match theme {
        None => {
            let _ = writeln!(out, "{name}");
            for theme in themes {
                let _ = writeln!(out, "  {theme}");
                for overlay in catalog::overlays(name, theme) {
                    let _ = writeln!(out, "    \"{overlay}\"");
                }
            }
        }
        Some(theme) => {
            let theme = canonical(&themes, theme)
                .ok_or_else(|| format!("Unknown theme '{theme}' for {name}"))?;
            let _ = writeln!(out, "{name} / {theme}");
            for overlay in catalog::overlays(name, theme) {
                let _ = writeln!(out, "  \"{overlay}\"");
            }
        }
    }

    Ok(out.trim_end().to_owned())
}

/// Find `input` among `options`, ignoring case.
#[must_use]
pub fn canonical<'a>(options: &[&'a str], input: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(input.trim()))
        .copied()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod status {
        use super::*;

        #[test]
        fn fresh_session() {
            let text = status(&AppState::new());
            assert!(text.contains("Country: -"));
            assert!(text.contains("(none)"));
            assert!(text.contains("Display: empty"));
            assert!(text.contains("Speech key: not set"));
            assert!(text.contains("Buttons: [Generate] | (Generate Variations)"));
            assert!(!text.contains("Variations:"));
        }

        #[test]
        fn selection_and_key() {
            let mut state = AppState::new();
            state.set_country(Some("Japan"));
            state.toggle_theme("Shibuya Crossing").unwrap();
            state.set_speech_key(Some("sk".into()));

            let text = status(&state);
            assert!(text.contains("Country: Japan"));
            assert!(text.contains("Theme:   Shibuya Crossing"));
            assert!(text.contains("Overlay: -"));
            assert!(text.contains("Speech key: set"));
        }
    }

    mod catalog_listing {
        use super::*;

        #[test]
        fn all_countries() {
            let text = catalog(None, None).unwrap();
            for name in catalog::countries() {
                assert!(text.contains(name));
            }
            assert!(text.contains("Japanese narration"));
        }

        #[test]
        fn country_is_case_insensitive() {
            let text = catalog(Some("japan"), None).unwrap();
            assert!(text.starts_with("Japan"));
            assert!(text.contains("Shibuya Crossing"));
        }

        #[test]
        fn theme_lists_overlays() {
            let text = catalog(Some("Japan"), Some("shibuya crossing")).unwrap();
            assert!(text.starts_with("Japan / Shibuya Crossing"));
            for overlay in catalog::overlays("Japan", "Shibuya Crossing") {
                assert!(text.contains(overlay));
            }
        }

        #[test]
        fn unknown_names() {
            assert!(catalog(Some("Atlantis"), None).is_err());
            let err = catalog(Some("Japan"), Some("Moon Base")).unwrap_err();
            assert_eq!(err, "Unknown theme 'Moon Base' for Japan");
        }
    }

    #[test]
    fn byte_sizes() {
        assert_eq!(bytes(512), "512 B");
        assert_eq!(bytes(2048), "2.0 KiB");
        assert_eq!(bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn canonical_names() {
        assert_eq!(canonical(&["Japan", "Italy"], " italy "), Some("Italy"));
        assert_eq!(canonical(&["Japan"], "Jap"), None);
    }
}
