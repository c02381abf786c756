//! Static country, theme, overlay, voice and language tables.
//!
//! The tables are fixed at compile time and never mutated.

/// Voice used when a country has no dedicated entry.
pub const DEFAULT_VOICE_ID: &str = "pNInz6obpgDQGcFmaJgB";

/// Narration language used when a country has no dedicated entry.
pub const DEFAULT_LANGUAGE: &str = "English";

/// One theme of a country together with its overlay snippets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeEntry {
    /// Theme name.
    pub name: &'static str,
    /// Overlay snippets offered for this theme.
    pub overlays: &'static [&'static str],
}

/// A supported country with its themes, narration voice and language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryEntry {
    /// Country name as shown to the user.
    pub name: &'static str,
    /// Themes in display order.
    pub themes: &'static [ThemeEntry],
    /// Speech-service voice identifier.
    pub voice_id: &'static str,
    /// Language the narration script is written in.
    pub language: &'static str,
}

const MIMI: &str = "SOYHLrjzK2X1ezoPC6cr";

/// All supported countries in display order.
pub static COUNTRIES: &[CountryEntry] = &[
    CountryEntry {
        name: "China",
        themes: &[
            ThemeEntry {
                name: "Great Wall",
                overlays: &["Timeless Majesty", "Dragon's Drive", "Ancient Power"],
            },
            ThemeEntry {
                name: "Chinese New Year",
                overlays: &["Fortune Rides", "Red Harmony", "Festival Spirit"],
            },
            ThemeEntry {
                name: "Shanghai Skyline",
                overlays: &["Future Pulse", "Neon Dreams", "Urban Legend"],
            },
            ThemeEntry {
                name: "Guilin Mountains",
                overlays: &["Serene Journey", "Misty Peaks", "Nature's Echo"],
            },
        ],
        voice_id: MIMI,
        language: "Mandarin Chinese",
    },
    CountryEntry {
        name: "USA",
        themes: &[
            ThemeEntry {
                name: "Route 66",
                overlays: &["Open Road", "American Legend", "Freedom's Highway"],
            },
            ThemeEntry {
                name: "Times Square",
                overlays: &["City Lights", "Never Sleeps", "Iconic Drive"],
            },
            ThemeEntry {
                name: "Grand Canyon",
                overlays: &["Vast Spirit", "Canyon Carver", "Horizon Bound"],
            },
            ThemeEntry {
                name: "California Beach",
                overlays: &["Coastline King", "Sun Chaser", "Golden Hour"],
            },
        ],
        voice_id: DEFAULT_VOICE_ID,
        language: "English",
    },
    CountryEntry {
        name: "Japan",
        themes: &[
            ThemeEntry {
                name: "Mt. Fuji & Cherry Blossoms",
                overlays: &["Sakura Speed", "Peak Serenity", "Elegant Power"],
            },
            ThemeEntry {
                name: "Shibuya Crossing",
                overlays: &["Urban Flow", "Tokyo Rush", "Future Forward"],
            },
            ThemeEntry {
                name: "Kyoto Bamboo Forest",
                overlays: &["Silent Strength", "Zen Drive", "Path of Tranquility"],
            },
            ThemeEntry {
                name: "Dotonbori Nightlife",
                overlays: &["Neon Nights", "Osaka Soul", "Vibrant Pulse"],
            },
        ],
        voice_id: MIMI,
        language: "Japanese",
    },
    CountryEntry {
        name: "Germany",
        themes: &[
            ThemeEntry {
                name: "Oktoberfest",
                overlays: &["Festival Fun", "Prost Power", "Joy Ride"],
            },
            ThemeEntry {
                name: "Brandenburg Gate",
                overlays: &["Berlin Bold", "Historic Drive", "United Power"],
            },
            ThemeEntry {
                name: "Neuschwanstein Castle",
                overlays: &["Fairy Tale", "Castle King", "Alpine Legend"],
            },
            ThemeEntry {
                name: "Black Forest",
                overlays: &["Forest Force", "Shadow Runner", "Deep Woods"],
            },
        ],
        voice_id: MIMI,
        language: "German",
    },
    CountryEntry {
        name: "Italy",
        themes: &[
            ThemeEntry {
                name: "Colosseum",
                overlays: &["Roman Roads", "Eternal Power", "Gladiator Spirit"],
            },
            ThemeEntry {
                name: "Venice Canals",
                overlays: &["Canal Cruiser", "Aqua Elegance", "Floating Dream"],
            },
            ThemeEntry {
                name: "Tuscan Countryside",
                overlays: &["Tuscan Sun", "Vineyard Veloce", "Rolling Hills"],
            },
            ThemeEntry {
                name: "Amalfi Coast",
                overlays: &["Coastal Curve", "Azure Drive", "La Dolce Vita"],
            },
        ],
        voice_id: MIMI,
        language: "Italian",
    },
];

/// Look up a country by exact name.
#[must_use]
pub fn country(name: &str) -> Option<&'static CountryEntry> {
    COUNTRIES.iter().find(|c| c.name == name)
}

/// Names of all supported countries.
#[must_use]
pub fn countries() -> Vec<&'static str> {
    COUNTRIES.iter().map(|c| c.name).collect()
}

/// Themes for a country; empty for unsupported countries.
#[must_use]
pub fn themes(country_name: &str) -> Vec<&'static str> {
    country(country_name)
        .map(|c| c.themes.iter().map(|t| t.name).collect())
        .unwrap_or_default()
}

/// Overlay snippets for a `(country, theme)` pair; empty if either is unknown.
#[must_use]
pub fn overlays(country_name: &str, theme: &str) -> &'static [&'static str] {
    country(country_name)
        .and_then(|c| c.themes.iter().find(|t| t.name == theme))
        .map(|t| t.overlays)
        .unwrap_or(&[])
}

/// Voice identifier for a country, falling back to [`DEFAULT_VOICE_ID`].
#[must_use]
pub fn voice_for(country_name: &str) -> &'static str {
    country(country_name).map_or(DEFAULT_VOICE_ID, |c| c.voice_id)
}

/// Narration language for a country, falling back to [`DEFAULT_LANGUAGE`].
#[must_use]
pub fn language_for(country_name: &str) -> &'static str {
    country(country_name).map_or(DEFAULT_LANGUAGE, |c| c.language)
}
