//! Integration tests for the HTTP clients using wiremock.

use reqwest::Client;
use weather_core::provider::{nominatim::NominatimGeocoder, openmeteo::OpenMeteoClient};
use weather_core::{Coordinate, FetchError, ForecastClient, GeocodeClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn paris() -> Coordinate {
    Coordinate {
        latitude: 48.85,
        longitude: 2.35,
    }
}

#[tokio::test]
async fn test_geocode_picks_first_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("city", "Paris"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "48.8566", "lon": "2.3522", "display_name": "Paris, France" },
            { "lat": "33.6609", "lon": "-95.5555", "display_name": "Paris, Texas" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), &mock_server.uri());
    let coord = geocoder.resolve("Paris").await.unwrap();

    assert_eq!(coord.latitude, 48.8566);
    assert_eq!(coord.longitude, 2.3522);
}

#[tokio::test]
async fn test_geocode_accepts_numeric_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "lat": -33.87, "lon": 151.21 }])),
        )
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), &mock_server.uri());
    let coord = geocoder.resolve("Sydney").await.unwrap();

    assert_eq!(coord, Coordinate { latitude: -33.87, longitude: 151.21 });
}

#[tokio::test]
async fn test_geocode_empty_result_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), &mock_server.uri());
    let err = geocoder.resolve("Atlantis").await.unwrap_err();

    assert_eq!(err, FetchError::NotFound);
}

#[tokio::test]
async fn test_geocode_server_error_is_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), &mock_server.uri());
    let err = geocoder.resolve("Paris").await.unwrap_err();

    let FetchError::Transport(msg) = err else {
        panic!("expected transport error");
    };
    assert!(msg.contains("503"));
    assert!(msg.contains("overloaded"));
}

#[tokio::test]
async fn test_geocode_invalid_json_is_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), &mock_server.uri());
    let err = geocoder.resolve("Paris").await.unwrap_err();

    assert!(
        err.to_string()
            .starts_with("Error while fetching data: Failed to parse Nominatim JSON")
    );
}

#[tokio::test]
async fn test_forecast_requests_days_and_series() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.85"))
        .and(query_param("longitude", "2.35"))
        .and(query_param("daily", "temperature_2m_max,temperature_2m_min"))
        .and(query_param("hourly", "temperature_2m"))
        .and(query_param("forecast_days", "2"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": {
                "time": ["2024-01-01", "2024-01-02"],
                "temperature_2m_max": [10.0, 11.0],
                "temperature_2m_min": [2.0, 3.0]
            },
            "hourly": {
                "time": ["2024-01-01T07:00", "2024-01-02T13:00"],
                "temperature_2m": [4.5, 8.0]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenMeteoClient::new(Client::new(), &mock_server.uri()).with_timezone("auto");
    let series = client.fetch(paris(), 2).await.unwrap();

    let days: Vec<_> = series.daily.days().collect();
    assert_eq!(days, vec![("2024-01-01", 2.0, 10.0), ("2024-01-02", 3.0, 11.0)]);

    let hourly = series.hourly.expect("hourly present");
    let samples: Vec<_> = hourly.samples().collect();
    assert_eq!(
        samples,
        vec![("2024-01-01T07:00", Some(4.5)), ("2024-01-02T13:00", Some(8.0))]
    );
}

#[tokio::test]
async fn test_forecast_without_hourly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": {
                "time": ["2024-01-01"],
                "temperature_2m_max": [10.0],
                "temperature_2m_min": [2.0]
            }
        })))
        .mount(&mock_server)
        .await;

    let client = OpenMeteoClient::new(Client::new(), &mock_server.uri());
    let series = client.fetch(paris(), 1).await.unwrap();

    assert!(series.hourly.is_none());
    assert_eq!(series.daily.len(), 1);
}

#[tokio::test]
async fn test_forecast_error_status_is_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Forecast days is invalid"
        })))
        .mount(&mock_server)
        .await;

    let client = OpenMeteoClient::new(Client::new(), &mock_server.uri());
    let err = client.fetch(paris(), 1).await.unwrap_err();

    let msg = err.to_string();
    assert!(
        msg.starts_with("Error while fetching data: Open-Meteo request failed with status 400")
    );
    assert!(msg.contains("Forecast days is invalid"));
}
