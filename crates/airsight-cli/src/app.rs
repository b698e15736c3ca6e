//! Wiring the session controller from configuration and flags.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use airsight_core::open_meteo::OpenMeteoClient;
use airsight_core::{
    Coordinate, EnvironmentalDataFetcher, LocationResolver, SessionController, WeatherService,
};
use airsight_store::Store;

use crate::config::Config;
use crate::location::ConfiguredLocation;
use crate::sink::TerminalSink;

/// Everything needed to build a session, resolved from config and flags.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub config: Config,
    pub position: Option<Coordinate>,
    pub db_path: PathBuf,
    pub weather: bool,
    pub no_color: bool,
    pub quiet: bool,
}

/// Build a session backed by Open-Meteo and the SQLite store.
pub fn build_session(settings: &SessionSettings) -> Result<SessionController> {
    let client = Arc::new(
        OpenMeteoClient::new(settings.config.open_meteo()).context("Failed to create HTTP client")?,
    );
    let store = Arc::new(
        Store::open(&settings.db_path)
            .with_context(|| format!("Failed to open database {}", settings.db_path.display()))?,
    );

    let geolocation = Arc::new(ConfiguredLocation::new(settings.position));
    let resolver = LocationResolver::new(geolocation, client.clone())
        .with_current_label(settings.config.location.label.clone());

    let weather = settings
        .weather
        .then(|| client.clone() as Arc<dyn WeatherService>);
    let fetcher = EnvironmentalDataFetcher::new(client, weather);

    let sink = Arc::new(TerminalSink::new(
        settings.no_color,
        settings.quiet,
        settings.config.alerts.desktop_notifications,
    ));

    debug!(db = %settings.db_path.display(), weather = settings.weather, "Session ready");
    Ok(SessionController::new(resolver, fetcher, store, sink))
}
