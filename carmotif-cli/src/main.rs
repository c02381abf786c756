//! Carmotif CLI - themed car promotion studio
//!
//! A terminal front end for the carmotif studio: upload car photos, pick a
//! country and theme, and generate a promotional image with narration.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

mod command;
mod error;
mod render;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use carmotif::config;
use carmotif::prelude::*;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};
use crate::session::Session;

/// Carmotif - restage your car in a country's cultural scenery
#[derive(Parser)]
#[command(name = "carmotif")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "CARMOTIF_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive studio session
    Studio(StudioArgs),

    /// List countries, themes and overlay snippets
    Catalog(CatalogArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the studio command
#[derive(Args)]
struct StudioArgs {
    /// Speech service key for narration (held in memory only)
    #[arg(short, long, env = "ELEVENLABS_API_KEY", hide_env_values = true)]
    speech_key: Option<String>,
}

/// Arguments for the catalog command
#[derive(Args)]
struct CatalogArgs {
    /// Country to show themes and overlays for
    country: Option<String>,

    /// Theme to show overlays for
    theme: Option<String>,
}

/// Arguments for the config command
#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Show configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "carmotif={level},carmotif_cli={level},{}",
            if verbosity >= 2 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Studio(args) => cmd_studio(args, cli.config).await,
        Commands::Catalog(args) => cmd_catalog(&args),
        Commands::Config(args) => cmd_config(args, cli.config).await,
    }
}

/// Start the interactive studio.
async fn cmd_studio(args: StudioArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = StudioConfig::load(config_path.as_deref()).await?;
    for issue in config.validate() {
        match issue.level {
            IssueLevel::Error => tracing::error!("{issue}"),
            IssueLevel::Warning => tracing::warn!("{issue}"),
        }
    }

    let studio = Studio::from_config(&config)?;
    tracing::debug!(?studio, "Studio ready");
    if args.speech_key.is_some() {
        studio.set_speech_key(args.speech_key).await;
    } else {
        println!("No speech key given; narration is skipped until you run 'key <speech-key>'.");
    }

    let session = Session::new(studio);
    tokio::select! {
        result = session.run() => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
            Ok(())
        }
    }
}

/// Print the catalog.
fn cmd_catalog(args: &CatalogArgs) -> Result<()> {
    if args.country.is_none() && args.theme.is_some() {
        return Err(CliError::usage("a theme needs a country"));
    }
    let listing = render::catalog(args.country.as_deref(), args.theme.as_deref())
        .map_err(CliError::Usage)?;
    println!("{listing}");
    Ok(())
}

/// Configuration management.
async fn cmd_config(args: ConfigArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config_file = config::resolve_path(config_path.as_deref());

    match args.command {
        ConfigCommands::Path => {
            println!("{}", config_file.display());
        }
        ConfigCommands::Show => {
            let config = StudioConfig::load(Some(&config_file)).await?;
            println!("# {}", config_file.display());
            println!("{}", config.to_toml()?);
            println!(
                "# image-generation key: {}",
                if config.gemini.api_key.is_empty() {
                    "not set"
                } else {
                    "set"
                }
            );
        }
        ConfigCommands::Init { force } => {
            if StudioConfig::init(&config_file, force).await? {
                println!("Configuration created: {}", config_file.display());
                println!();
                println!("Next steps:");
                println!("  1. export GEMINI_API_KEY=<key>");
                println!("  2. carmotif studio --speech-key <key>");
            } else {
                println!("Configuration already exists at: {}", config_file.display());
                println!("Use --force to overwrite.");
            }
        }
        ConfigCommands::Validate => {
            let config = StudioConfig::load(Some(&config_file)).await?;
            let issues = config.validate();
            for issue in &issues {
                println!("{issue}");
            }
            if config.is_valid() {
                println!("Configuration is valid");
            } else {
                return Err(CliError::usage("configuration has errors"));
            }
        }
    }

    Ok(())
}
