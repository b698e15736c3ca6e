//! HTTP adapters for the Open-Meteo geocoding, air-quality and forecast APIs.
//!
//! One [`OpenMeteoClient`] implements [`GeocodingService`],
//! [`AirQualityService`] and [`WeatherService`] over a shared
//! [`reqwest::Client`].
//!
//! # Example
//!
//! ```no_run
//! use airsight_core::open_meteo::{OpenMeteoClient, OpenMeteoConfig};
//! use airsight_core::traits::GeocodingService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenMeteoClient::new(OpenMeteoConfig::default())?;
//! let found = client.search("Berlin", 1).await?;
//! println!("{:?}", found.first().map(|c| c.display_name()));
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use airsight_types::{AirQualityReading, Coordinate, WeatherReading};

use crate::error::{Error, Provider, Result};
use crate::traits::{
    AirQualityReport, AirQualityService, GeocodeCandidate, GeocodingService, HourlySeries,
    WeatherService,
};

/// Default geocoding endpoint.
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
/// Default air-quality endpoint.
pub const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
/// Default weather forecast endpoint.
pub const WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

const AIR_QUALITY_CURRENT: &str = "european_aqi,pm10,pm2_5,carbon_monoxide,nitrogen_dioxide";
const AIR_QUALITY_HOURLY: &str = "european_aqi";
const WEATHER_CURRENT: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,surface_pressure,weather_code";

/// Endpoints and request options.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenMeteoConfig {
    /// Geocoding search endpoint.
    pub geocoding_url: String,
    /// Air-quality endpoint.
    pub air_quality_url: String,
    /// Weather forecast endpoint.
    pub weather_url: String,
    /// Language for geocoding results.
    pub language: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            geocoding_url: GEOCODING_URL.to_string(),
            air_quality_url: AIR_QUALITY_URL.to_string(),
            weather_url: WEATHER_URL.to_string(),
            language: "en".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for all three Open-Meteo services.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoClient {
    /// Create a client with its own connection pool.
    pub fn new(config: OpenMeteoConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("airsight/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(config, client))
    }

    /// Create a client around an existing reqwest client.
    pub fn with_client(config: OpenMeteoConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &OpenMeteoConfig {
        &self.config
    }

    async fn get<T: DeserializeOwned>(
        &self,
        provider: Provider,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(%provider, url, "Sending request");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::transport(provider, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("request failed");
            warn!(%provider, status = status.as_u16(), "Provider returned an error status");
            return Err(Error::http_status(provider, status.as_u16(), reason));
        }

        response
            .json()
            .await
            .map_err(|e| Error::transport(provider, format!("invalid response body: {e}")))
    }
}

fn coordinate_query(coordinate: Coordinate) -> [(&'static str, String); 2] {
    [
        ("latitude", coordinate.latitude.to_string()),
        ("longitude", coordinate.longitude.to_string()),
    ]
}

// ==========================================================================
// Response Types
// ==========================================================================

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    #[serde(default)]
    current: Option<AirQualityCurrent>,
    #[serde(default)]
    hourly: Option<AirQualityHourly>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AirQualityCurrent {
    european_aqi: Option<f64>,
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    nitrogen_dioxide: Option<f64>,
    carbon_monoxide: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AirQualityHourly {
    time: Vec<String>,
    european_aqi: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    current: Option<WeatherCurrent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WeatherCurrent {
    temperature_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    relative_humidity_2m: Option<f64>,
    wind_speed_10m: Option<f64>,
    surface_pressure: Option<f64>,
    weather_code: Option<i32>,
}

impl From<AirQualityResponse> for AirQualityReport {
    fn from(response: AirQualityResponse) -> Self {
        let current = response.current.map(|c| AirQualityReading {
            index: c.european_aqi.filter(|v| !v.is_nan()),
            pm2_5: c.pm2_5,
            pm10: c.pm10,
            nitrogen_dioxide: c.nitrogen_dioxide,
            carbon_monoxide: c.carbon_monoxide,
        });
        let hourly = response.hourly.unwrap_or_default();
        AirQualityReport {
            current,
            hourly: HourlySeries {
                time: hourly.time,
                index: hourly.european_aqi,
            },
        }
    }
}

impl WeatherCurrent {
    fn into_reading(self) -> Option<WeatherReading> {
        Some(WeatherReading {
            temperature: self.temperature_2m?,
            apparent_temperature: self.apparent_temperature?,
            humidity_pct: self.relative_humidity_2m?,
            wind_speed: self.wind_speed_10m?,
            pressure: self.surface_pressure?,
            weather_code: self.weather_code?,
        })
    }
}

// ==========================================================================
// Service Implementations
// ==========================================================================

#[async_trait]
impl GeocodingService for OpenMeteoClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeCandidate>> {
        let params = [
            ("name", query.to_string()),
            ("count", limit.to_string()),
            ("language", self.config.language.clone()),
            ("format", "json".to_string()),
        ];
        let response: GeocodingResponse = self
            .get(Provider::Geocoding, &self.config.geocoding_url, &params)
            .await?;

        let candidates = response
            .results
            .into_iter()
            .filter_map(|r| match Coordinate::new(r.latitude, r.longitude) {
                Ok(coordinate) => Some(GeocodeCandidate {
                    name: r.name,
                    country: r.country,
                    coordinate,
                }),
                Err(e) => {
                    warn!(name = %r.name, error = %e, "Skipping geocoding result");
                    None
                }
            })
            .take(limit)
            .collect::<Vec<_>>();

        debug!(query, found = candidates.len(), "Geocoding complete");
        Ok(candidates)
    }
}

#[async_trait]
impl AirQualityService for OpenMeteoClient {
    async fn air_quality(&self, coordinate: Coordinate) -> Result<AirQualityReport> {
        let [lat, lon] = coordinate_query(coordinate);
        let params = [
            lat,
            lon,
            ("current", AIR_QUALITY_CURRENT.to_string()),
            ("hourly", AIR_QUALITY_HOURLY.to_string()),
            ("timezone", "auto".to_string()),
        ];
        let response: AirQualityResponse = self
            .get(Provider::AirQuality, &self.config.air_quality_url, &params)
            .await?;
        Ok(response.into())
    }
}

#[async_trait]
impl WeatherService for OpenMeteoClient {
    async fn current_weather(&self, coordinate: Coordinate) -> Result<WeatherReading> {
        let [lat, lon] = coordinate_query(coordinate);
        let params = [
            lat,
            lon,
            ("current", WEATHER_CURRENT.to_string()),
            ("timezone", "auto".to_string()),
        ];
        let response: WeatherResponse = self
            .get(Provider::Weather, &self.config.weather_url, &params)
            .await?;

        response
            .current
            .and_then(WeatherCurrent::into_reading)
            .ok_or(Error::DataUnavailable)
    }
}
