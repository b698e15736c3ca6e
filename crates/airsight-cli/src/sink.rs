//! Alert delivery for the terminal.

use async_trait::async_trait;
use owo_colors::OwoColorize;
use tracing::debug;

use airsight_core::{AlertSink, HapticKind, SinkError};

/// Prints alerts to stderr and optionally raises a desktop notification.
///
/// Terminals have no haptics; haptic requests are only logged.
#[derive(Debug, Clone, Copy)]
pub struct TerminalSink {
    no_color: bool,
    quiet: bool,
    desktop: bool,
}

impl TerminalSink {
    pub fn new(no_color: bool, quiet: bool, desktop: bool) -> Self {
        Self {
            no_color,
            quiet,
            desktop,
        }
    }

    /// Line printed to stderr for an alert.
    pub fn render(&self, title: &str, body: &str) -> String {
        if self.no_color {
            format!("[!] {title} {body}")
        } else {
            format!("{} {}", format!("[!] {title}").yellow().bold(), body)
        }
    }
}

#[async_trait]
impl AlertSink for TerminalSink {
    async fn notify(&self, title: &str, body: &str) -> Result<(), SinkError> {
        if !self.quiet {
            eprintln!("{}", self.render(title, body));
        }
        if self.desktop {
            desktop_notification(title, body)?;
        }
        Ok(())
    }

    async fn haptic(&self, kind: HapticKind) -> Result<(), SinkError> {
        debug!(?kind, "Haptic requested");
        Ok(())
    }
}

#[cfg(feature = "desktop-notifications")]
fn desktop_notification(title: &str, body: &str) -> Result<(), SinkError> {
    use notify_rust::Notification;

    let mut notification = Notification::new();
    notification.summary(title).body(body).appname("airsight");

    #[cfg(target_os = "linux")]
    notification.urgency(notify_rust::Urgency::Critical);

    notification
        .show()
        .map(|_| debug!(title, "Desktop notification sent"))
        .map_err(|e| SinkError(e.to_string()))
}

#[cfg(not(feature = "desktop-notifications"))]
fn desktop_notification(_title: &str, _body: &str) -> Result<(), SinkError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        let sink = TerminalSink::new(true, false, false);
        assert_eq!(sink.render("High AQI Alert!", "Stay in."), "[!] High AQI Alert! Stay in.");
    }

    #[tokio::test]
    async fn test_haptic_is_accepted() {
        let sink = TerminalSink::new(true, true, false);
        assert!(sink.haptic(HapticKind::Warning).await.is_ok());
        assert!(sink.notify("t", "b").await.is_ok());
    }
}
