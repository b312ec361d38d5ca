//! Integration tests for OpenWeatherClient and NominatimGeocoder using wiremock.

use nimbus_weather::{
    Coordinates, NominatimGeocoder, OpenWeatherClient, WeatherApi, WeatherClientConfig,
    WeatherError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEATHER_PATH: &str = "/data/2.5/weather";

fn london_body() -> serde_json::Value {
    serde_json::json!({
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 18.3, "feels_like": 17.9, "humidity": 52},
        "name": "London",
        "cod": 200
    })
}

fn client_for(server: &MockServer) -> OpenWeatherClient {
    let mut config = WeatherClientConfig::new("test-key");
    config.base_url = format!("{}{}", server.uri(), WEATHER_PATH);
    OpenWeatherClient::new(config).unwrap()
}

#[tokio::test]
async fn test_fetch_by_coordinates_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("lat", "51.5074"))
        .and(query_param("lon", "-0.1278"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let report = client
        .fetch_by_coordinates(Coordinates::new(51.5074, -0.1278))
        .await
        .unwrap();

    assert_eq!(report.description.as_deref(), Some("clear sky"));
    assert_eq!(report.temperature_celsius, Some(18.3));
    assert_eq!(report.icon_code.as_deref(), Some("01d"));
    assert_eq!(report.fallback_name.as_deref(), Some("London"));
}

#[tokio::test]
async fn test_fetch_by_city_name_sends_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "San Francisco"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "weather": [{"description": "fog", "icon": "50d"}],
            "main": {"temp": 12.0},
            "name": "San Francisco"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let report = client.fetch_by_city_name("San Francisco").await.unwrap();

    assert_eq!(report.fallback_name.as_deref(), Some("San Francisco"));
    assert_eq!(report.temperature_celsius, Some(12.0));
}

#[tokio::test]
async fn test_city_not_found_is_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Nowhereville"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.fetch_by_city_name("Nowhereville").await.unwrap_err();

    match err {
        WeatherError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("city not found"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_success_ignores_body_content() {
    let mock_server = MockServer::start().await;

    // A 401 with an otherwise valid weather body is still a failure
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(london_body()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .fetch_by_coordinates(Coordinates::new(0.0, 0.0))
        .await
        .unwrap_err();

    assert!(err.is_status(), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.fetch_by_city_name("London").await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_sparse_body_is_accepted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Atlantis"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let report = client.fetch_by_city_name("Atlantis").await.unwrap();

    assert_eq!(report.fallback_name.as_deref(), Some("Atlantis"));
    assert!(report.description.is_none());
    assert!(report.temperature_celsius.is_none());
    assert!(report.icon_code.is_none());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Reserve a free port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut config = WeatherClientConfig::new("test-key");
    config.base_url = format!("http://127.0.0.1:{}{}", port, WEATHER_PATH);
    let client = OpenWeatherClient::new(config).unwrap();

    let err = client.fetch_by_city_name("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::Network(_)), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_reverse_geocode_first_candidate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "51.5074"))
        .and(query_param("lon", "-0.1278"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Westminster, London, England, United Kingdom",
            "address": {
                "city": "London",
                "state_district": "Greater London",
                "state": "England",
                "country": "United Kingdom"
            }
        })))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(&format!("{}/reverse", mock_server.uri())).unwrap();
    let names = geocoder
        .reverse(Coordinates::new(51.5074, -0.1278))
        .await
        .unwrap();

    assert_eq!(names.len(), 1);
    assert_eq!(names[0].city, "London");
    assert_eq!(names[0].region, "England");
}

#[tokio::test]
async fn test_reverse_geocode_open_water_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "Unable to geocode"
        })))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(&format!("{}/reverse", mock_server.uri())).unwrap();
    let names = geocoder.reverse(Coordinates::new(0.0, -30.0)).await.unwrap();

    assert!(names.is_empty());
}

#[tokio::test]
async fn test_reverse_geocode_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(&format!("{}/reverse", mock_server.uri())).unwrap();
    assert!(geocoder
        .reverse(Coordinates::new(51.5074, -0.1278))
        .await
        .is_err());
}
