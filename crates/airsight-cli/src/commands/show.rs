//! Current, search and recall commands.

use std::process::ExitCode;

use anyhow::{Result, bail};

use airsight_core::{Action, SessionController, SessionState};

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_state_text};

/// What to show conditions for.
#[derive(Debug, Clone)]
pub enum Target {
    /// The configured device position.
    Current,
    /// A free-text place name.
    Search(String),
    /// A history entry, 1-based.
    Recall(usize),
}

pub async fn cmd_show(
    session: &SessionController,
    target: Target,
    format: OutputFormat,
    no_color: bool,
) -> Result<ExitCode> {
    let state = match target {
        Target::Current => session.start().await,
        Target::Search(query) => {
            session.load_persisted().await;
            session.dispatch(Action::Search(query)).await
        }
        Target::Recall(n) => {
            session.load_persisted().await;
            let history = session.history().await;
            let Some(entry) = n.checked_sub(1).and_then(|i| history.get(i)).cloned() else {
                bail!(
                    "No history entry #{n} ({} remembered, see `airsight history`)",
                    history.len()
                );
            };
            session.dispatch(Action::SelectHistory(entry)).await
        }
    };

    let opts = FormatOptions::new(no_color, session.theme().await);
    match format {
        OutputFormat::Json => print!("{}", opts.as_json(&state)?),
        OutputFormat::Text => match &state {
            SessionState::Failed { .. } => {
                eprint!("{}", format_state_text(&state, session.thresholds(), &opts));
            }
            _ => print!("{}", format_state_text(&state, session.thresholds(), &opts)),
        },
    }

    Ok(if state.failure().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
