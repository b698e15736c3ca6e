//! Theme command implementation.

use anyhow::Result;

use airsight_core::SessionController;

use crate::cli::{OutputFormat, ThemeAction};
use crate::format::{FormatOptions, ThemeOutput};

pub async fn cmd_theme(
    session: &SessionController,
    action: ThemeAction,
    format: OutputFormat,
    no_color: bool,
) -> Result<()> {
    session.load_persisted().await;

    let theme = match action {
        ThemeAction::Show => session.theme().await,
        ThemeAction::Toggle => session.toggle_theme().await,
        ThemeAction::Set { theme } => {
            session.set_theme(theme.into()).await;
            session.theme().await
        }
    };

    let opts = FormatOptions::new(no_color, theme);
    match format {
        OutputFormat::Json => print!("{}", opts.as_json(&ThemeOutput { theme })?),
        OutputFormat::Text => println!("{theme}"),
    }
    Ok(())
}
