//! OpenWeatherMap current-weather client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Coordinates, WeatherError, WeatherReport};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const UNITS: &str = "metric";

/// Source of current-weather reports.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    async fn fetch_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherReport, WeatherError>;

    async fn fetch_by_city_name(&self, name: &str) -> Result<WeatherReport, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    #[serde(default)]
    weather: Vec<OwmCondition>,
    main: Option<OwmMain>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
}

impl From<OwmResponse> for WeatherReport {
    fn from(resp: OwmResponse) -> Self {
        // Only the first condition is shown
        let condition = resp.weather.into_iter().next();
        let (description, icon_code) = match condition {
            Some(c) => (c.description, c.icon),
            None => (None, None),
        };

        Self {
            description,
            temperature_celsius: resp.main.and_then(|m| m.temp),
            icon_code,
            fallback_name: resp.name,
        }
    }
}

/// Build the icon image URL for a condition code, e.g. `.../img/wn/01d@4x.png`.
pub fn icon_url(base_url: &str, icon_code: &str) -> String {
    format!("{}/{}@4x.png", base_url.trim_end_matches('/'), icon_code)
}

#[derive(Debug, Clone)]
pub struct WeatherClientConfig {
    pub base_url: String,
    pub api_key: String,
    /// `None` leaves the transport's default in place
    pub timeout: Option<Duration>,
}

impl WeatherClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherClientConfig) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    async fn fetch(&self, params: &[(&str, String)]) -> Result<WeatherReport, WeatherError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("units", UNITS), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!("Weather API returned status {}: {}", status, body);
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OwmResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(parsed.into())
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    #[instrument(skip(self), level = "info")]
    async fn fetch_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherReport, WeatherError> {
        self.fetch(&[
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
        ])
        .await
    }

    #[instrument(skip(self), level = "info")]
    async fn fetch_by_city_name(&self, name: &str) -> Result<WeatherReport, WeatherError> {
        self.fetch(&[("q", name.to_string())]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_url() {
        assert_eq!(
            icon_url("http://openweathermap.org/img/wn", "01d"),
            "http://openweathermap.org/img/wn/01d@4x.png"
        );
        assert_eq!(
            icon_url("http://openweathermap.org/img/wn/", "10n"),
            "http://openweathermap.org/img/wn/10n@4x.png"
        );
    }

    #[test]
    fn test_report_from_full_payload() {
        let resp: OwmResponse = serde_json::from_value(serde_json::json!({
            "weather": [
                {"description": "clear sky", "icon": "01d"},
                {"description": "mist", "icon": "50d"}
            ],
            "main": {"temp": 18.3, "humidity": 40},
            "name": "London"
        }))
        .unwrap();

        let report = WeatherReport::from(resp);
        assert_eq!(report.description.as_deref(), Some("clear sky"));
        assert_eq!(report.icon_code.as_deref(), Some("01d"));
        assert_eq!(report.temperature_celsius, Some(18.3));
        assert_eq!(report.fallback_name.as_deref(), Some("London"));
    }

    #[test]
    fn test_report_tolerates_missing_fields() {
        let resp: OwmResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(WeatherReport::from(resp), WeatherReport::default());

        let resp: OwmResponse =
            serde_json::from_value(serde_json::json!({"weather": [], "main": {}})).unwrap();
        let report = WeatherReport::from(resp);
        assert!(report.description.is_none());
        assert!(report.temperature_celsius.is_none());
    }

    #[test]
    fn test_client_config_defaults() {
        let config = WeatherClientConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
        assert!(OpenWeatherClient::new(config).is_ok());
    }
}
