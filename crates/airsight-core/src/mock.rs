//! In-memory collaborators for testing.
//!
//! Every boundary trait in [`crate::traits`] has a mock here so the session
//! can be driven end-to-end without network access, a location service or a
//! database.
//!
//! # Features
//!
//! - **Failure injection**: make any mock fail with a chosen error
//! - **Latency simulation**: delay responses to exercise request supersession
//! - **Call recording**: inspect how many calls were made and with what input

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use airsight_types::{AirQualityReading, Coordinate, WeatherReading};

use crate::error::{Error, PersistenceError, Result, SinkError};
use crate::traits::{
    AirQualityReport, AirQualityService, AlertSink, GeocodeCandidate, GeocodingService,
    GeolocationProvider, HapticKind, HourlySeries, KeyValueStore, PermissionStatus,
    WeatherService,
};

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

// ==========================================================================
// Geolocation
// ==========================================================================

/// Mock device position source.
#[derive(Debug)]
pub struct MockGeolocation {
    permission: PermissionStatus,
    position: std::result::Result<Coordinate, String>,
    latency: Duration,
    permission_requests: AtomicU32,
    position_requests: AtomicU32,
}

impl MockGeolocation {
    /// Permission granted, fix at `position`.
    pub fn at(position: Coordinate) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: Ok(position),
            latency: Duration::ZERO,
            permission_requests: AtomicU32::new(0),
            position_requests: AtomicU32::new(0),
        }
    }

    /// Permission refused.
    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            position: Err("permission denied".to_string()),
            ..Self::at(Coordinate {
                latitude: 0.0,
                longitude: 0.0,
            })
        }
    }

    /// Permission granted but the fix fails with `reason`.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            position: Err(reason.to_string()),
            ..Self::at(Coordinate {
                latitude: 0.0,
                longitude: 0.0,
            })
        }
    }

    /// Delay the position fix.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of permission requests made.
    pub fn permission_requests(&self) -> u32 {
        self.permission_requests.load(Ordering::Relaxed)
    }

    /// Number of position fixes requested.
    pub fn position_requests(&self) -> u32 {
        self.position_requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl GeolocationProvider for MockGeolocation {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission_requests.fetch_add(1, Ordering::Relaxed);
        self.permission
    }

    async fn current_position(&self) -> Result<Coordinate> {
        self.position_requests.fetch_add(1, Ordering::Relaxed);
        simulate_latency(self.latency).await;
        self.position.clone().map_err(Error::LocationUnavailable)
    }
}

// ==========================================================================
// Geocoding
// ==========================================================================

/// Mock geocoding service keyed by case-insensitive query.
#[derive(Debug, Default)]
pub struct MockGeocoder {
    places: HashMap<String, Vec<GeocodeCandidate>>,
    latency: HashMap<String, Duration>,
    failure: Mutex<Option<Error>>,
    queries: Mutex<Vec<String>>,
    limits: Mutex<Vec<usize>>,
}

impl MockGeocoder {
    /// Geocoder with no known places.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate returned for `query`.
    #[must_use]
    pub fn with_place(
        mut self,
        query: &str,
        name: &str,
        country: &str,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        self.places
            .entry(query.to_lowercase())
            .or_default()
            .push(GeocodeCandidate {
                name: name.to_string(),
                country: Some(country.to_string()),
                coordinate: Coordinate {
                    latitude,
                    longitude,
                },
            });
        self
    }

    /// Delay responses for `query`.
    #[must_use]
    pub fn with_latency_for(mut self, query: &str, latency: Duration) -> Self {
        self.latency.insert(query.to_lowercase(), latency);
        self
    }

    /// Fail every subsequent search with `error`.
    pub fn fail_with(&self, error: Error) {
        *lock(&self.failure) = Some(error);
    }

    /// Number of searches made.
    pub fn call_count(&self) -> usize {
        lock(&self.queries).len()
    }

    /// Queries received, in order.
    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }

    /// Result limits requested, in order.
    pub fn limits(&self) -> Vec<usize> {
        lock(&self.limits).clone()
    }
}

#[async_trait]
impl GeocodingService for MockGeocoder {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeCandidate>> {
        lock(&self.queries).push(query.to_string());
        lock(&self.limits).push(limit);

        let key = query.to_lowercase();
        if let Some(latency) = self.latency.get(&key) {
            simulate_latency(*latency).await;
        }
        if let Some(err) = lock(&self.failure).clone() {
            return Err(err);
        }

        let mut found = self.places.get(&key).cloned().unwrap_or_default();
        found.truncate(limit);
        Ok(found)
    }
}

// ==========================================================================
// Air quality
// ==========================================================================

/// Mock air-quality service returning a fixed report.
#[derive(Debug)]
pub struct MockAirQuality {
    report: Mutex<AirQualityReport>,
    latency: Duration,
    index_at: Vec<(Coordinate, f64)>,
    latency_at: Vec<(Coordinate, Duration)>,
    failure: Mutex<Option<Error>>,
    call_count: AtomicU32,
}

impl MockAirQuality {
    /// Service returning `current` with an empty forecast.
    pub fn new(current: AirQualityReading) -> Self {
        Self {
            report: Mutex::new(AirQualityReport {
                current: Some(current),
                hourly: HourlySeries::default(),
            }),
            latency: Duration::ZERO,
            index_at: Vec::new(),
            latency_at: Vec::new(),
            failure: Mutex::new(None),
            call_count: AtomicU32::new(0),
        }
    }

    /// Service returning a typical reading with the given index.
    pub fn with_index(index: f64) -> Self {
        Self::new(AirQualityReading {
            index: Some(index),
            pm2_5: Some(8.4),
            pm10: Some(15.1),
            nitrogen_dioxide: Some(12.0),
            carbon_monoxide: Some(180.0),
        })
    }

    /// Service whose current object lacks the index.
    pub fn without_index() -> Self {
        Self::new(AirQualityReading {
            pm10: Some(15.1),
            ..AirQualityReading::default()
        })
    }

    /// Set the hourly series.
    #[must_use]
    pub fn with_hourly(self, hourly: HourlySeries) -> Self {
        lock(&self.report).hourly = hourly;
        self
    }

    /// Delay every response.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Report `index` instead of the default for one coordinate.
    #[must_use]
    pub fn with_index_at(mut self, latitude: f64, longitude: f64, index: f64) -> Self {
        self.index_at.push((Coordinate { latitude, longitude }, index));
        self
    }

    /// Delay responses for one coordinate.
    #[must_use]
    pub fn with_latency_at(mut self, latitude: f64, longitude: f64, latency: Duration) -> Self {
        self.latency_at.push((Coordinate { latitude, longitude }, latency));
        self
    }

    /// Change the current index returned by later calls.
    pub fn set_index(&self, index: f64) {
        let mut report = lock(&self.report);
        let current = report.current.get_or_insert_with(AirQualityReading::default);
        current.index = Some(index);
    }

    /// Fail every subsequent call with `error`.
    pub fn fail_with(&self, error: Error) {
        *lock(&self.failure) = Some(error);
    }

    /// Number of calls made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AirQualityService for MockAirQuality {
    async fn air_quality(&self, coordinate: Coordinate) -> Result<AirQualityReport> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let latency = self
            .latency_at
            .iter()
            .find(|(c, _)| *c == coordinate)
            .map_or(self.latency, |(_, latency)| *latency);
        simulate_latency(latency).await;
        if let Some(err) = lock(&self.failure).clone() {
            return Err(err);
        }

        let mut report = lock(&self.report).clone();
        if let Some((_, index)) = self.index_at.iter().find(|(c, _)| *c == coordinate) {
            let current = report.current.get_or_insert_with(AirQualityReading::default);
            current.index = Some(*index);
        }
        Ok(report)
    }
}

// ==========================================================================
// Weather
// ==========================================================================

/// Mock weather service.
#[derive(Debug)]
pub struct MockWeather {
    reading: WeatherReading,
    latency: Duration,
    failure: Mutex<Option<Error>>,
    call_count: AtomicU32,
}

impl Default for MockWeather {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWeather {
    /// Service returning a mild spring reading.
    pub fn new() -> Self {
        Self {
            reading: WeatherReading {
                temperature: 18.5,
                apparent_temperature: 17.9,
                humidity_pct: 55.0,
                wind_speed: 11.2,
                pressure: 1013.2,
                weather_code: 2,
            },
            latency: Duration::ZERO,
            failure: Mutex::new(None),
            call_count: AtomicU32::new(0),
        }
    }

    /// Delay every response.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail every subsequent call with `error`.
    pub fn fail_with(&self, error: Error) {
        *lock(&self.failure) = Some(error);
    }

    /// Number of calls made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WeatherService for MockWeather {
    async fn current_weather(&self, _coordinate: Coordinate) -> Result<WeatherReading> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        simulate_latency(self.latency).await;
        if let Some(err) = lock(&self.failure).clone() {
            return Err(err);
        }
        Ok(self.reading)
    }
}

// ==========================================================================
// Persistence
// ==========================================================================

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    should_fail: AtomicBool,
    write_count: AtomicU32,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value directly.
    pub fn insert(&self, key: &str, value: &str) {
        lock(&self.values).insert(key.to_string(), value.to_string());
    }

    /// Read a value directly.
    pub fn value(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    /// Make reads and writes fail.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, PersistenceError> {
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(PersistenceError::Backend("mock read failure".into()));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), PersistenceError> {
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(PersistenceError::Backend("mock write failure".into()));
        }
        self.insert(key, value);
        self.write_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

// ==========================================================================
// Alerts
// ==========================================================================

/// Alert sink that records everything it is asked to deliver.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notifications: Mutex<Vec<(String, String)>>,
    haptics: Mutex<Vec<HapticKind>>,
    should_fail: AtomicBool,
    latency: Duration,
}

impl RecordingSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every delivery.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make deliveries fail (they are still recorded).
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    /// Notifications delivered as `(title, body)`.
    pub fn notifications(&self) -> Vec<(String, String)> {
        lock(&self.notifications).clone()
    }

    /// Haptics triggered, in order.
    pub fn haptics(&self) -> Vec<HapticKind> {
        lock(&self.haptics).clone()
    }

    fn outcome(&self) -> std::result::Result<(), SinkError> {
        if self.should_fail.load(Ordering::Relaxed) {
            Err(SinkError("mock sink failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn notify(&self, title: &str, body: &str) -> std::result::Result<(), SinkError> {
        lock(&self.notifications).push((title.to_string(), body.to_string()));
        simulate_latency(self.latency).await;
        self.outcome()
    }

    async fn haptic(&self, kind: HapticKind) -> std::result::Result<(), SinkError> {
        lock(&self.haptics).push(kind);
        simulate_latency(self.latency).await;
        self.outcome()
    }
}
