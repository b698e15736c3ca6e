//! Command implementations for the CLI.

mod config;
mod history;
mod show;
mod theme;

pub use config::cmd_config;
pub use history::cmd_history;
pub use show::{Target, cmd_show};
pub use theme::cmd_theme;
