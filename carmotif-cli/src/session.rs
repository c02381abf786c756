//! Interactive studio session.
//!
//! Reads one command per line from stdin and drives a [`Studio`]. Generation
//! and variation runs are spawned so the prompt stays responsive; the studio
//! rejects overlapping starts on its own.

use std::io::Write as _;
use std::path::Path;

use carmotif::catalog;
use carmotif::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::command::{Command, ExportKind, HELP};
use crate::error::{CliError, Result};
use crate::render;

const PROMPT: &str = "studio> ";

/// Result of one executed command.
#[derive(Debug)]
pub enum Reply {
    /// Text to print right away.
    Text(String),
    /// A background job was started; it prints its own outcome.
    Started(JoinHandle<()>),
    /// The session ends.
    Quit,
}

/// A studio session bound to stdin and stdout.
#[derive(Debug, Clone)]
pub struct Session {
    studio: Studio,
}

impl Session {
    /// Create a session over `studio`.
    #[must_use]
    pub const fn new(studio: Studio) -> Self {
        Self { studio }
    }

    /// Run the read-eval loop until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin or stdout fail.
    pub async fn run(&self) -> Result<()> {
        println!("Carmotif studio | type 'help' for commands, 'quit' to leave\n");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("{PROMPT}");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!();
                break;
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(Reply::Text(text)) if !text.is_empty() => println!("{text}"),
                Ok(Reply::Text(_) | Reply::Started(_)) => {}
                Ok(Reply::Quit) => break,
                Err(e) => println!("error: {e}"),
            }
        }

        if self.studio.snapshot().await.view().is_loading() {
            println!("A generation is still running and will be abandoned.");
        }
        Ok(())
    }

    /// Execute one command against the studio.
    ///
    /// # Errors
    ///
    /// Returns the studio's error for rejected actions, or an IO error from
    /// `upload`/`export`.
    pub async fn execute(&self, command: Command) -> Result<Reply> {
        debug!(?command, "Executing studio command");
        let text = match command {
            Command::Upload(paths) => {
                let count = self.studio.ingest_paths(&paths).await?;
                format!("Uploaded {count} image(s).")
            }
            Command::Remove(index) => {
                self.studio.remove_image(index).await?;
                let left = self.studio.snapshot().await.uploads().len();
                format!("Removed image {}. {left} left.", index + 1)
            }
            Command::Country(None) => {
                self.studio.set_country(None).await;
                "Country cleared.".to_owned()
            }
            Command::Country(Some(name)) => {
                let country = render::canonical(&catalog::countries(), &name)
                    .ok_or_else(|| CliError::usage(format!("Unknown country '{name}'")))?;
                self.studio.set_country(Some(country)).await;
                let themes = catalog::themes(country).join(", ");
                format!("Country: {country}\nThemes: {themes}")
            }
            Command::Theme(name) => {
                let themes = self.studio.snapshot().await.selection().available_themes();
                let theme = render::canonical(&themes, &name).unwrap_or(name.as_str());
                let toggle = self.studio.toggle_theme(theme).await?;
                let overlays = self.studio.snapshot().await.selection().available_overlays();
                match toggle {
                    Toggle::Selected => {
                        format!("Theme: {theme}\nOverlays: {}", overlays.join(", "))
                    }
                    Toggle::Deselected => format!("Theme '{theme}' deselected."),
                }
            }
            Command::Overlay(text) => {
                let overlays = self.studio.snapshot().await.selection().available_overlays();
                let overlay = render::canonical(overlays, &text).unwrap_or(text.as_str());
                match self.studio.toggle_overlay(overlay).await? {
                    Toggle::Selected => format!("Overlay: \"{overlay}\""),
                    Toggle::Deselected => format!("Overlay \"{overlay}\" deselected."),
                }
            }
            Command::Key(key) => {
                let set = key.is_some();
                self.studio.set_speech_key(key).await;
                if set && self.studio.snapshot().await.has_speech_key() {
                    "Speech key set.".to_owned()
                } else {
                    "Speech key cleared, narration will be skipped.".to_owned()
                }
            }
            Command::Generate => return Ok(Reply::Started(self.spawn_generation())),
            Command::Variations => return Ok(Reply::Started(self.spawn_variations())),
            Command::Pick(index) => {
                self.studio.select_variation(index).await?;
                format!("Showing car variation {}.", index + 1)
            }
            Command::Status => render::status(&self.studio.snapshot().await),
            Command::Export(kind, path) => self.export(kind, &path).await?,
            Command::Help => HELP.to_owned(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }

    fn spawn_generation(&self) -> JoinHandle<()> {
        let studio = self.studio.clone();
        println!("Generating...");
        tokio::spawn(async move {
            let outcome = studio.generate().await;
            let state = studio.snapshot().await;
            match outcome {
                Ok(()) => println!("\n{}", generation_summary(&state)),
                Err(e) => println!("\n{}", failure(&state, &e)),
            }
            reprompt();
        })
    }

    fn spawn_variations(&self) -> JoinHandle<()> {
        let studio = self.studio.clone();
        println!("Generating variations...");
        tokio::spawn(async move {
            let outcome = studio.generate_variations().await;
            let state = studio.snapshot().await;
            match outcome {
                Ok(count) => {
                    println!("\n{count} of {VARIATION_COUNT} variation(s) ready:");
                    for (index, label) in state.variation_labels().iter().enumerate() {
                        println!("  {}. {label}", index + 1);
                    }
                    println!("Use 'pick <n>' to switch the displayed image.");
                }
                Err(e) => println!("\n{}", failure(&state, &e)),
            }
            reprompt();
        })
    }

    async fn export(&self, kind: ExportKind, path: &Path) -> Result<String> {
        let state = self.studio.snapshot().await;
        let bytes = match kind {
            ExportKind::Image => state
                .displayed_image()
                .ok_or(CliError::NothingToExport("no image is displayed"))?
                .to_bytes()
                .map_err(|e| CliError::Decode(e.to_string()))?,
            ExportKind::Audio => state
                .audio()
                .ok_or(CliError::NothingToExport("no narration has been generated"))?
                .bytes()
                .to_vec(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &bytes).await?;
        Ok(format!("Saved {} bytes to {}", bytes.len(), path.display()))
    }
}

fn reprompt() {
    print!("{PROMPT}");
    if let Err(e) = std::io::stdout().flush() {
        debug!(error = %e, "Could not flush the prompt");
    }
}

/// The message the view shows for a failed run, else the error itself.
fn failure(state: &AppState, error: &Error) -> String {
    state
        .view()
        .error_message()
        .map_or_else(|| error.to_string(), str::to_owned)
}

fn generation_summary(state: &AppState) -> String {
    let mut lines = vec!["Generation finished.".to_owned()];
    if let Some(text) = state.view().result_text().filter(|t| !t.is_empty()) {
        lines.push(text.to_owned());
    }
    if let Some(clip) = state.audio() {
        lines.push(format!(
            "Narration ready ({} bytes). Save it with 'export audio narration.{}'.",
            clip.len(),
            clip.extension()
        ));
    } else if state.view().credential_invalid() {
        lines.push(
            "The speech key was rejected. Enter a new one with 'key <speech-key>'.".to_owned(),
        );
    }
    lines.join("\n")
}
