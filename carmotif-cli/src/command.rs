//! Studio session commands.

use std::path::PathBuf;

use crate::error::{CliError, Result};

/// What to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// The image on the main display.
    Image,
    /// The narration clip.
    Audio,
}

/// One line of input in the studio session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the reference images.
    Upload(Vec<PathBuf>),
    /// Remove a reference image (0-based).
    Remove(usize),
    /// Select or clear the country.
    Country(Option<String>),
    /// Toggle a theme.
    Theme(String),
    /// Toggle an overlay snippet.
    Overlay(String),
    /// Set or clear the speech key.
    Key(Option<String>),
    /// Start a primary generation.
    Generate,
    /// Start a variation run.
    Variations,
    /// Pick a gallery entry (0-based).
    Pick(usize),
    /// Print the session state.
    Status,
    /// Save an artifact to a path.
    Export(ExportKind, PathBuf),
    /// Print the command list.
    Help,
    /// Leave the session.
    Quit,
}

/// Help text for the studio session.
pub const HELP: &str = "\
Commands:
  upload <file>...          Replace the reference images
  remove <n>                Remove reference image n
  country <name|none>       Select or clear the country
  theme <name>              Toggle a theme of the country
  overlay <text>            Toggle an overlay snippet of the theme
  key <speech-key>|clear    Set or clear the speech key for narration
  generate                  Generate the themed image and narration
  variations                Generate camera-angle variations
  pick <n>                  Show variation n and use it as the baseline
  status                    Show the session state
  export image <path>       Save the displayed image
  export audio <path>       Save the narration clip
  help                      Show this help
  quit                      Leave the studio";

impl Command {
    /// Parse a line; `Ok(None)` for blank input.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(v, r)| (v, r.trim()));

        let command = match verb.to_ascii_lowercase().as_str() {
            "upload" => {
                if rest.is_empty() {
                    return Err(CliError::usage("usage: upload <file>..."));
                }
                Self::Upload(rest.split_whitespace().map(PathBuf::from).collect())
            }
            "remove" => Self::Remove(position(rest, "remove <n>")?),
            "country" => match rest {
                "" => return Err(CliError::usage("usage: country <name|none>")),
                r if r.eq_ignore_ascii_case("none") => Self::Country(None),
                r => Self::Country(Some(r.to_owned())),
            },
            "theme" => Self::Theme(required(rest, "theme <name>")?),
            "overlay" => Self::Overlay(required(rest, "overlay <text>")?),
            "key" => match rest {
                "" => return Err(CliError::usage("usage: key <speech-key>|clear")),
                "clear" => Self::Key(None),
                r => Self::Key(Some(r.to_owned())),
            },
            "generate" | "gen" => Self::Generate,
            "variations" | "vary" => Self::Variations,
            "pick" => Self::Pick(position(rest, "pick <n>")?),
            "status" => Self::Status,
            "export" => {
                let (kind, path) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| CliError::usage("usage: export <image|audio> <path>"))?;
                let kind = match kind {
                    "image" => ExportKind::Image,
                    "audio" => ExportKind::Audio,
                    other => return Err(CliError::usage(format!("cannot export '{other}'"))),
                };
                Self::Export(kind, PathBuf::from(path.trim()))
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(CliError::usage(format!(
                    "unknown command '{other}', type 'help' for a list"
                )));
            }
        };
        Ok(Some(command))
    }
}

fn required(rest: &str, usage: &str) -> Result<String> {
    if rest.is_empty() {
        Err(CliError::usage(format!("usage: {usage}")))
    } else {
        Ok(rest.to_owned())
    }
}

/// Parse a 1-based position into a 0-based index.
fn position(rest: &str, usage: &str) -> Result<usize> {
    rest.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| CliError::usage(format!("usage: {usage} (n starts at 1)")))
}
