//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use airsight_types::ThemePreference;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Theme names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for ThemePreference {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => ThemePreference::Dark,
            ThemeArg::Light => ThemePreference::Light,
        }
    }
}

#[derive(Parser)]
#[command(name = "airsight")]
#[command(author, version, about = "Air quality and weather for where you are", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Latitude of the device position (overrides config)
    #[arg(long, global = true, allow_hyphen_values = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude of the device position (overrides config)
    #[arg(long, global = true, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Database path (overrides config)
    #[arg(long, global = true, env = "AIRSIGHT_DB")]
    pub db: Option<PathBuf>,

    /// Skip the weather request
    #[arg(long, global = true)]
    pub no_weather: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show conditions at the configured position
    Current,

    /// Look up a place by name and show its conditions
    Search {
        /// Place name (multiple words are joined)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// List recently viewed locations
    History,

    /// Show conditions for a recent location
    Recall {
        /// Position in the history list (1 = most recent)
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        index: u16,
    },

    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Theme subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ThemeAction {
    /// Show the current theme
    Show,
    /// Switch between dark and light
    Toggle,
    /// Set the theme explicitly
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Initialize default configuration
    Init,
}
