//! History command implementation.

use anyhow::Result;

use airsight_core::SessionController;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_history_text};

pub async fn cmd_history(
    session: &SessionController,
    format: OutputFormat,
    no_color: bool,
) -> Result<()> {
    session.load_persisted().await;
    let entries = session.history().await;
    let opts = FormatOptions::new(no_color, session.theme().await);

    let content = match format {
        OutputFormat::Json => opts.as_json(&entries)?,
        OutputFormat::Text => format_history_text(&entries, &opts),
    };
    print!("{content}");
    Ok(())
}
