//! Prompt construction for the image and text models.

use std::fmt::Write as _;

use crate::catalog;

/// Camera angles used for variations, reused cyclically.
pub const CAMERA_ANGLES: [&str; 3] = [
    "dramatic front three-quarter angle",
    "sleek rear three-quarter angle",
    "full side profile",
];

/// Camera angle for the `index`-th variation.
#[must_use]
pub const fn camera_angle(index: usize) -> &'static str {
    CAMERA_ANGLES[index % CAMERA_ANGLES.len()]
}

/// Prompt for the primary themed image.
///
/// When an overlay is given, a clause asks for that exact text to be rendered
/// legibly into the scene.
#[must_use]
pub fn scene_prompt(country: &str, theme: &str, overlay: Option<&str>) -> String {
    let mut prompt = format!(
        "Set the car in a scene characteristic of {country}, with the theme of \"{theme}\". \
         Consider the cultural and visual elements of this theme."
    );
    if let Some(text) = overlay {
        let _ = write!(
            prompt,
            " Additionally, elegantly render the text \"{text}\" onto the image. \
             The text should be integrated naturally into the scene, matching the theme's \
             aesthetics and looking like a professional part of the advertisement."
        );
    }
    prompt
}

/// Prompt for the narration voice-over script, localized by country.
#[must_use]
pub fn narration_prompt(country: &str, theme: &str) -> String {
    let language = catalog::language_for(country);
    format!(
        "Create a single, short, exciting, 15-20 word voice-over script for a car commercial. \
         The scene is in {country} with a theme of \"{theme}\". \
         The tone should be epic and inspiring. IMPORTANT: Write the script in {language}. \
         Do not provide multiple options, translations, or any text other than the script itself."
    )
}

/// Prompt for one camera-angle variation.
///
/// The request carries the generated image first and the original references
/// after it; the prompt explains that ordering to the model.
#[must_use]
pub fn variation_prompt(theme: &str, angle: &str) -> String {
    format!(
        "This is a multi-image prompt. The first image is the final customized car. \
         The subsequent images are the original, unmodified car from various angles. \
         Your task is to act as an expert automotive photographer. \
         Re-create the scene from the first image, but capture the car from a new perspective: \
         a {angle}. It is crucial to use the other images as a reference to perfectly maintain \
         the car's original make, model, and shape. Do NOT change the car's customizations, \
         color, or the \"{theme}\" theme scenery. Only change the camera angle."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_prompt_embeds_selection() {
        let p = scene_prompt("Japan", "Shibuya Crossing", Some("Tokyo Rush"));
        assert!(p.contains("Japan"));
        assert!(p.contains("Shibuya Crossing"));
        assert!(p.contains("\"Tokyo Rush\""));
        assert!(p.contains("render the text"));
    }

    #[test]
    fn overlay_clause_extends_scene_prompt() {
        let base = scene_prompt("Japan", "Shibuya Crossing", None);
        let full = scene_prompt("Japan", "Shibuya Crossing", Some("Tokyo Rush"));
        let clause = full.strip_prefix(&base).unwrap_or_default();
        assert!(clause.starts_with(" Additionally, elegantly render the text \"Tokyo Rush\""));
        assert!(clause.ends_with("professional part of the advertisement."));
    }

    #[test]
    fn scene_prompt_without_overlay() {
        let p = scene_prompt("Italy", "Colosseum", None);
        assert!(p.contains("Italy"));
        assert!(!p.contains("render the text"));
    }

    #[test]
    fn narration_uses_country_language() {
        assert!(narration_prompt("Germany", "Oktoberfest").contains("Write the script in German."));
        assert!(narration_prompt("China", "Great Wall").contains("Mandarin Chinese"));
        assert!(narration_prompt("Peru", "Machu Picchu").contains("Write the script in English."));
    }

    #[test]
    fn narration_asks_for_single_script() {
        let p = narration_prompt("USA", "Route 66");
        assert!(p.contains("15-20 word"));
        assert!(p.contains("Do not provide multiple options"));
    }

    #[test]
    fn camera_angles_cycle() {
        assert_eq!(camera_angle(0), "dramatic front three-quarter angle");
        assert_eq!(camera_angle(2), "full side profile");
        assert_eq!(camera_angle(3), camera_angle(0));
        assert_eq!(camera_angle(7), camera_angle(1));
    }

    #[test]
    fn variation_prompt_keeps_theme() {
        let p = variation_prompt("Route 66", camera_angle(1));
        assert!(p.contains("sleek rear three-quarter angle"));
        assert!(p.contains("\"Route 66\" theme scenery"));
        assert!(p.contains("Only change the camera angle."));
    }
}
