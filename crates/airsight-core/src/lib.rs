//! Session core for location-aware air-quality and weather lookups.
//!
//! This crate sequences everything between a user action and an observable
//! session state: resolving where the user is (device position or place
//! search), fetching current air quality, an hourly forecast and weather,
//! classifying the index, raising alerts, and remembering recent locations.
//!
//! # Features
//!
//! - **Location resolution**: device position with permission handling, or
//!   free-text geocoding
//! - **Concurrent fetching**: air quality and weather are requested together;
//!   weather failures degrade gracefully
//! - **Classification**: six-band European AQI scale with colors and advice
//! - **Alerts**: notification and haptic above a configurable threshold
//! - **History**: six most recent locations, most recent first, persisted
//! - **Supersession**: a newer request always wins over an older one
//! - **Open-Meteo adapters** (feature `open-meteo`, on by default)
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use airsight_core::mock::{MemoryStore, MockGeolocation, RecordingSink};
//! use airsight_core::open_meteo::{OpenMeteoClient, OpenMeteoConfig};
//! use airsight_core::{EnvironmentalDataFetcher, LocationResolver, SessionController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(OpenMeteoClient::new(OpenMeteoConfig::default())?);
//!     let resolver = LocationResolver::new(Arc::new(MockGeolocation::denied()), client.clone());
//!     let fetcher = EnvironmentalDataFetcher::new(client.clone(), Some(client));
//!     let session = SessionController::new(
//!         resolver,
//!         fetcher,
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(RecordingSink::new()),
//!     );
//!
//!     let state = session.search("Berlin").await;
//!     println!("{state:?}");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod fetcher;
pub mod history;
pub mod mock;
#[cfg(feature = "open-meteo")]
pub mod open_meteo;
pub mod preferences;
pub mod resolver;
pub mod session;
pub mod state;
pub mod thresholds;
pub mod traits;

// Core exports
pub use error::{Error, ErrorKind, PersistenceError, Provider, Result, SinkError};
pub use fetcher::{EnvironmentalData, EnvironmentalDataFetcher, FORECAST_HOURS};
pub use history::{HISTORY_CAP, HistoryStore};
pub use preferences::PreferenceStore;
pub use resolver::{CURRENT_LOCATION_LABEL, LocationResolver};
pub use session::{ALERT_TITLE, SessionController, alert_body};
pub use state::{Action, Effect, RequestToken, SessionMachine, SessionState};
pub use thresholds::{AqiLevel, Classification, ThresholdConfig, Thresholds};
pub use traits::{
    AirQualityReport, AirQualityService, AlertSink, GeocodeCandidate, GeocodingService,
    GeolocationProvider, HapticKind, HourlySeries, KeyValueStore, PermissionStatus,
    WeatherService,
};

// Re-export from airsight-types
pub use airsight_types::{
    AirQualityReading, Coordinate, ForecastPoint, HistoryEntry, ResolvedLocation,
    ThemePreference, WeatherReading,
};
