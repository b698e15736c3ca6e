//! Trait abstractions for the session's external collaborators.
//!
//! Each trait describes one boundary the core consumes. Production
//! implementations live in [`crate::open_meteo`] and the airsight-store
//! crate; in-memory implementations for testing live in [`crate::mock`].

use async_trait::async_trait;

use airsight_types::{AirQualityReading, Coordinate, WeatherReading};

use crate::error::{PersistenceError, Result, SinkError};

/// Outcome of a location permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Permission granted.
    Granted,
    /// Permission refused.
    Denied,
}

/// Source of the device's own position.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Ask for foreground location permission.
    async fn request_permission(&self) -> PermissionStatus;

    /// Obtain a single position fix.
    ///
    /// Implementations return [`crate::Error::LocationUnavailable`] when no
    /// fix can be obtained.
    async fn current_position(&self) -> Result<Coordinate>;
}

/// One candidate returned by a geocoding lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    /// Place name.
    pub name: String,
    /// Country, when the provider reports one.
    pub country: Option<String>,
    /// Position of the place.
    pub coordinate: Coordinate,
}

impl GeocodeCandidate {
    /// Display name in the form `"{place}, {country}"`.
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

/// Free-text place name resolution.
#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// Search for `query`, returning at most `limit` candidates in relevance
    /// order. An empty list means "no match" and is not an error.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeCandidate>>;
}

/// Raw hourly index series as parallel arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    /// Provider timestamps.
    pub time: Vec<String>,
    /// Index per timestamp, positionally paired with `time`.
    pub index: Vec<Option<f64>>,
}

/// Air-quality provider response before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirQualityReport {
    /// Current readings. `None` when the provider omitted the object.
    pub current: Option<AirQualityReading>,
    /// Hourly forecast series.
    pub hourly: HourlySeries,
}

/// Current pollutants and hourly index forecast.
#[async_trait]
pub trait AirQualityService: Send + Sync {
    /// Fetch the report for a coordinate.
    async fn air_quality(&self, coordinate: Coordinate) -> Result<AirQualityReport>;
}

/// Current meteorological readings.
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Fetch current weather for a coordinate.
    async fn current_weather(&self, coordinate: Coordinate) -> Result<WeatherReading>;
}

/// Asynchronous string key-value store.
///
/// Both operations are best-effort from the core's point of view.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, PersistenceError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), PersistenceError>;
}

/// Haptic feedback style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticKind {
    /// Alert-level feedback.
    Warning,
    /// Request completed without alert.
    Success,
    /// Light tap, e.g. theme toggle.
    Light,
}

/// Notification and haptic output. Fire-and-forget.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Show a user notification.
    async fn notify(&self, title: &str, body: &str) -> std::result::Result<(), SinkError>;

    /// Trigger haptic feedback.
    async fn haptic(&self, kind: HapticKind) -> std::result::Result<(), SinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_display_name() {
        let c = GeocodeCandidate {
            name: "Berlin".into(),
            country: Some("Germany".into()),
            coordinate: Coordinate::new(52.5, 13.4).unwrap(),
        };
        assert_eq!(c.display_name(), "Berlin, Germany");
    }

    #[test]
    fn test_candidate_display_name_without_country() {
        let c = GeocodeCandidate {
            name: "Antarctica Station".into(),
            country: None,
            coordinate: Coordinate::new(-75.0, 0.0).unwrap(),
        };
        assert_eq!(c.display_name(), "Antarctica Station");
    }
}
