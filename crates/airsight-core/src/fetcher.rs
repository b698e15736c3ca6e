//! Concurrent retrieval and normalization of air-quality and weather data.
//!
//! Air quality is the primary product: its failure fails the whole fetch.
//! Weather is supplementary and degrades to absent on failure.

use std::sync::Arc;

use time::PrimitiveDateTime;
use time::macros::format_description;
use tracing::{debug, warn};

use airsight_types::{AirQualityReading, Coordinate, ForecastPoint, WeatherReading};

use crate::error::{Error, Result};
use crate::traits::{AirQualityService, HourlySeries, WeatherService};

/// Number of hourly points kept in the forecast.
pub const FORECAST_HOURS: usize = 24;

/// Normalized result of a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentalData {
    /// Current pollutants. `index` is always present.
    pub air_quality: AirQualityReading,
    /// Up to [`FORECAST_HOURS`] hourly points in provider order.
    pub forecast: Vec<ForecastPoint>,
    /// Current weather, absent when unsupported or failed.
    pub weather: Option<WeatherReading>,
}

/// Render a provider timestamp as an `HH:MM` label.
///
/// Accepts `YYYY-MM-DDTHH:MM` and `YYYY-MM-DDTHH:MM:SS`; anything else is
/// returned verbatim.
pub fn time_label(raw: &str) -> String {
    let minutes = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let label = format_description!("[hour]:[minute]");

    PrimitiveDateTime::parse(raw, minutes)
        .or_else(|_| PrimitiveDateTime::parse(raw, seconds))
        .ok()
        .and_then(|dt| dt.format(label).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// Take the first `limit` hourly points, pairing each timestamp with the
/// index at the same position.
pub fn extract_forecast(hourly: &HourlySeries, limit: usize) -> Vec<ForecastPoint> {
    hourly
        .time
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, time)| ForecastPoint {
            time_label: time_label(time),
            index: hourly.index.get(i).copied().flatten(),
        })
        .collect()
}

/// Fetches and normalizes provider data for a coordinate.
#[derive(Clone)]
pub struct EnvironmentalDataFetcher {
    air_quality: Arc<dyn AirQualityService>,
    weather: Option<Arc<dyn WeatherService>>,
}

impl std::fmt::Debug for EnvironmentalDataFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentalDataFetcher")
            .field("weather_enabled", &self.weather.is_some())
            .finish_non_exhaustive()
    }
}

impl EnvironmentalDataFetcher {
    /// Create a fetcher. Pass `None` for `weather` when the deployment has
    /// no weather service.
    pub fn new(
        air_quality: Arc<dyn AirQualityService>,
        weather: Option<Arc<dyn WeatherService>>,
    ) -> Self {
        Self {
            air_quality,
            weather,
        }
    }

    /// Fetch air quality (current + forecast) and weather concurrently.
    pub async fn fetch(&self, coordinate: Coordinate) -> Result<EnvironmentalData> {
        let air_fut = self.air_quality.air_quality(coordinate);
        let weather_fut = async {
            match &self.weather {
                Some(service) => Some(service.current_weather(coordinate).await),
                None => None,
            }
        };

        let (air, weather) = tokio::join!(air_fut, weather_fut);
        let report = air?;

        let air_quality = match report.current {
            Some(current) if current.index.is_some() => current,
            _ => {
                warn!(%coordinate, "Air quality response omitted the current index");
                return Err(Error::DataUnavailable);
            }
        };

        let weather = match weather {
            Some(Ok(reading)) => Some(reading),
            Some(Err(e)) => {
                warn!(error = %e, "Weather unavailable, continuing without it");
                None
            }
            None => None,
        };

        let forecast = extract_forecast(&report.hourly, FORECAST_HOURS);
        debug!(
            %coordinate,
            index = ?air_quality.index,
            forecast_points = forecast.len(),
            has_weather = weather.is_some(),
            "Fetched environmental data"
        );

        Ok(EnvironmentalData {
            air_quality,
            forecast,
            weather,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Provider;
    use crate::mock::{MockAirQuality, MockWeather};

    fn series(n: usize) -> HourlySeries {
        HourlySeries {
            time: (0..n)
                .map(|i| format!("2024-03-{:02}T{:02}:00", 1 + i / 24, i % 24))
                .collect(),
            index: (0..n).map(|i| Some(i as f64)).collect(),
        }
    }

    fn coord() -> Coordinate {
        Coordinate::new(52.5, 13.4).unwrap()
    }

    #[test]
    fn test_time_label_formats_hour_minute() {
        assert_eq!(time_label("2024-03-01T13:00"), "13:00");
        assert_eq!(time_label("2024-03-01T07:30:00"), "07:30");
    }

    #[test]
    fn test_time_label_keeps_unparseable() {
        assert_eq!(time_label("tomorrow"), "tomorrow");
    }

    #[test]
    fn test_extract_forecast_truncates_to_24() {
        let forecast = extract_forecast(&series(30), FORECAST_HOURS);
        assert_eq!(forecast.len(), 24);
        assert_eq!(forecast[0].index, Some(0.0));
        assert_eq!(forecast[23].index, Some(23.0));
        assert_eq!(forecast[23].time_label, "23:00");
    }

    #[test]
    fn test_extract_forecast_short_series() {
        let forecast = extract_forecast(&series(10), FORECAST_HOURS);
        assert_eq!(forecast.len(), 10);
        let indices: Vec<_> = forecast.iter().map(|p| p.index).collect();
        assert_eq!(indices, (0..10).map(|i| Some(i as f64)).collect::<Vec<_>>());
    }

    #[test]
    fn test_extract_forecast_missing_values() {
        let hourly = HourlySeries {
            time: vec!["2024-03-01T00:00".into(), "2024-03-01T01:00".into()],
            index: vec![None],
        };
        let forecast = extract_forecast(&hourly, FORECAST_HOURS);
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].index, None);
        assert_eq!(forecast[1].index, None);
    }

    #[tokio::test]
    async fn test_fetch_success_with_weather() {
        let aq = Arc::new(MockAirQuality::with_index(35.0).with_hourly(series(30)));
        let weather = Arc::new(MockWeather::new());
        let fetcher = EnvironmentalDataFetcher::new(aq, Some(weather));

        let data = fetcher.fetch(coord()).await.unwrap();
        assert_eq!(data.air_quality.index, Some(35.0));
        assert_eq!(data.forecast.len(), 24);
        assert!(data.weather.is_some());
    }

    #[tokio::test]
    async fn test_fetch_weather_failure_degrades() {
        let aq = Arc::new(MockAirQuality::with_index(35.0));
        let weather = Arc::new(MockWeather::new());
        weather.fail_with(Error::transport(Provider::Weather, "boom"));
        let fetcher = EnvironmentalDataFetcher::new(aq, Some(weather));

        let data = fetcher.fetch(coord()).await.unwrap();
        assert!(data.weather.is_none());
    }

    #[tokio::test]
    async fn test_fetch_without_weather_service() {
        let aq = Arc::new(MockAirQuality::with_index(35.0));
        let fetcher = EnvironmentalDataFetcher::new(aq, None);
        assert!(fetcher.fetch(coord()).await.unwrap().weather.is_none());
    }

    #[tokio::test]
    async fn test_fetch_air_quality_failure_is_fatal() {
        let aq = Arc::new(MockAirQuality::with_index(35.0));
        aq.fail_with(Error::http_status(Provider::AirQuality, 500, "Internal Server Error"));
        let fetcher = EnvironmentalDataFetcher::new(aq, Some(Arc::new(MockWeather::new())));

        let err = fetcher.fetch(coord()).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::TransportError);
    }

    #[tokio::test]
    async fn test_fetch_missing_index_is_data_unavailable() {
        let aq = Arc::new(MockAirQuality::without_index());
        let fetcher = EnvironmentalDataFetcher::new(aq, None);
        assert_eq!(fetcher.fetch(coord()).await, Err(Error::DataUnavailable));
    }

    #[tokio::test]
    async fn test_fetch_keeps_absent_pollutants() {
        let aq = Arc::new(MockAirQuality::new(AirQualityReading {
            index: Some(12.0),
            pm2_5: Some(4.0),
            ..AirQualityReading::default()
        }));
        let fetcher = EnvironmentalDataFetcher::new(aq, None);
        let data = fetcher.fetch(coord()).await.unwrap();
        assert_eq!(data.air_quality.pm2_5, Some(4.0));
        assert_eq!(data.air_quality.pm10, None);
        assert_eq!(data.air_quality.carbon_monoxide, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_runs_concurrently() {
        use std::time::Duration;

        let aq = Arc::new(MockAirQuality::with_index(35.0).with_latency(Duration::from_millis(200)));
        let weather = Arc::new(MockWeather::new().with_latency(Duration::from_millis(200)));
        let fetcher = EnvironmentalDataFetcher::new(aq, Some(weather));

        let start = tokio::time::Instant::now();
        fetcher.fetch(coord()).await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(400));
    }
}
