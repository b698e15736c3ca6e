//! Command-line interface for air-quality and weather lookups.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `current` | Conditions at the configured position |
//! | `search` | Conditions for a place name |
//! | `history` | Recently viewed locations |
//! | `recall` | Conditions for a recent location |
//! | `theme` | Show or change the color theme |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! The CLI reads `~/.config/airsight/config.toml` (or platform equivalent).
//! Flags override the file; `NO_COLOR` disables colored output.

mod app;
mod cli;
mod commands;
mod config;
mod format;
mod location;
mod sink;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::app::{SessionSettings, build_session};
use crate::cli::{Cli, Commands, ThemeAction};
use crate::commands::{Target, cmd_config, cmd_history, cmd_show, cmd_theme};
use crate::config::{Config, resolve_position};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "airsight", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();

    if let Commands::Config { action } = cli.command {
        cmd_config(action, &config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let settings = SessionSettings {
        position: resolve_position(cli.lat, cli.lon, &config)?,
        db_path: config.db_path(cli.db.clone()),
        weather: config.providers.weather_enabled && !cli.no_weather,
        no_color: cli.no_color,
        quiet: cli.quiet,
        config,
    };
    let session = build_session(&settings)?;

    match cli.command {
        Commands::Current => cmd_show(&session, Target::Current, cli.format, cli.no_color).await,
        Commands::Search { query } => {
            let target = Target::Search(query.join(" "));
            cmd_show(&session, target, cli.format, cli.no_color).await
        }
        Commands::Recall { index } => {
            let target = Target::Recall(usize::from(index));
            cmd_show(&session, target, cli.format, cli.no_color).await
        }
        Commands::History => {
            cmd_history(&session, cli.format, cli.no_color).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Theme { action } => {
            let action = action.unwrap_or(ThemeAction::Show);
            cmd_theme(&session, action, cli.format, cli.no_color).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { .. } | Commands::Completions { .. } => Ok(ExitCode::SUCCESS),
    }
}
