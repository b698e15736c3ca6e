//! Open-Meteo adapter tests against a local mock HTTP server.

#![cfg(feature = "open-meteo")]

use std::sync::Arc;
use std::time::Duration;

use airsight_core::mock::{MemoryStore, MockGeolocation, RecordingSink};
use airsight_core::open_meteo::{OpenMeteoClient, OpenMeteoConfig};
use airsight_core::{
    AirQualityService, Coordinate, EnvironmentalDataFetcher, Error, ErrorKind, GeocodingService,
    LocationResolver, SessionController, SessionState, WeatherService,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenMeteoClient {
    let config = OpenMeteoConfig {
        geocoding_url: format!("{}/v1/search", server.uri()),
        air_quality_url: format!("{}/v1/air-quality", server.uri()),
        weather_url: format!("{}/v1/forecast", server.uri()),
        language: "en".to_string(),
        timeout: Duration::from_secs(5),
    };
    OpenMeteoClient::new(config).unwrap()
}

fn berlin() -> Coordinate {
    Coordinate::new(52.52, 13.41).unwrap()
}

fn hourly(n: usize) -> serde_json::Value {
    let time: Vec<_> = (0..n)
        .map(|i| format!("2024-03-{:02}T{:02}:00", 1 + i / 24, i % 24))
        .collect();
    let index: Vec<_> = (0..n).map(|i| 20 + i).collect();
    serde_json::json!({ "time": time, "european_aqi": index })
}

async fn mount_berlin(server: &MockServer, aqi: f64) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"id": 2950159, "name": "Berlin", "latitude": 52.52437, "longitude": 13.41053, "country": "Germany"}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": {"time": "2024-03-01T12:00", "european_aqi": aqi, "pm10": 14.2, "pm2_5": 8.8},
            "hourly": hourly(30)
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": {
                "temperature_2m": 12.4,
                "apparent_temperature": 10.9,
                "relative_humidity_2m": 71,
                "wind_speed_10m": 14.8,
                "surface_pressure": 1009.6,
                "weather_code": 3
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_geocoding_sends_expected_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Berlin"))
        .and(query_param("count", "1"))
        .and(query_param("language", "en"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"name": "Berlin", "latitude": 52.52, "longitude": 13.41, "country": "Germany"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = client_for(&server).search("Berlin", 1).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].display_name(), "Berlin, Germany");
}

#[tokio::test]
async fn test_geocoding_without_results_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"generationtime_ms": 0.4})),
        )
        .mount(&server)
        .await;

    let found = client_for(&server).search("Zzzqx", 1).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_geocoding_without_country_uses_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"name": "Antarctica Station", "latitude": -77.8, "longitude": 166.7}]
        })))
        .mount(&server)
        .await;

    let found = client_for(&server).search("station", 1).await.unwrap();
    assert_eq!(found[0].display_name(), "Antarctica Station");
}

#[tokio::test]
async fn test_air_quality_parses_current_and_hourly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .and(query_param("current", "european_aqi,pm10,pm2_5,carbon_monoxide,nitrogen_dioxide"))
        .and(query_param("hourly", "european_aqi"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": {"european_aqi": 37, "pm10": 14.2},
            "hourly": hourly(3)
        })))
        .mount(&server)
        .await;

    let report = client_for(&server).air_quality(berlin()).await.unwrap();

    let current = report.current.unwrap();
    assert_eq!(current.index, Some(37.0));
    assert_eq!(current.pm10, Some(14.2));
    assert_eq!(current.nitrogen_dioxide, None);
    assert_eq!(report.hourly.time.len(), 3);
    assert_eq!(report.hourly.index[2], Some(22.0));
}

#[tokio::test]
async fn test_server_error_maps_to_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).air_quality(berlin()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert!(matches!(err, Error::Transport { status: Some(500), .. }));
}

#[tokio::test]
async fn test_malformed_body_maps_to_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).search("Berlin", 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
}

#[tokio::test]
async fn test_weather_parses_current() {
    let server = MockServer::start().await;
    mount_berlin(&server, 35.0).await;

    let weather = client_for(&server).current_weather(berlin()).await.unwrap();

    assert_eq!(weather.temperature, 12.4);
    assert_eq!(weather.humidity_pct, 71.0);
    assert_eq!(weather.weather_code, 3);
}

#[tokio::test]
async fn test_incomplete_weather_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": {"temperature_2m": 12.4}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).current_weather(berlin()).await.unwrap_err();
    assert_eq!(err, Error::DataUnavailable);
}

#[tokio::test]
async fn test_session_over_http() {
    let server = MockServer::start().await;
    mount_berlin(&server, 35.0).await;

    let client = Arc::new(client_for(&server));
    let session = SessionController::new(
        LocationResolver::new(Arc::new(MockGeolocation::denied()), client.clone()),
        EnvironmentalDataFetcher::new(client.clone(), Some(client)),
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingSink::new()),
    );

    let state = session.search("Berlin").await;

    match state {
        SessionState::Ready {
            location,
            air_quality,
            forecast,
            weather,
            ..
        } => {
            assert_eq!(location, "Berlin, Germany");
            assert_eq!(air_quality.index, Some(35.0));
            assert_eq!(forecast.len(), 24);
            assert_eq!(forecast[0].time_label, "00:00");
            assert!(weather.is_some());
        }
        other => panic!("expected Ready, got {other:?}"),
    }
}

#[tokio::test]
async fn test_session_weather_outage_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_berlin(&server, 35.0).await;

    let client = Arc::new(client_for(&server));
    let session = SessionController::new(
        LocationResolver::new(Arc::new(MockGeolocation::denied()), client.clone()),
        EnvironmentalDataFetcher::new(client.clone(), Some(client)),
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingSink::new()),
    );

    match session.search("Berlin").await {
        SessionState::Ready { weather, .. } => assert!(weather.is_none()),
        other => panic!("expected Ready, got {other:?}"),
    }
}
