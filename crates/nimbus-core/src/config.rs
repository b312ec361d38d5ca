use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `weather.api_key` from the config file.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const DEFAULT_ICON_BASE_URL: &str = "http://openweathermap.org/img/wn";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `config.toml`
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Device location settings
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key. Required.
    #[serde(default)]
    pub api_key: String,

    /// Current-weather endpoint
    #[serde(default = "default_weather_url")]
    pub base_url: String,

    /// Base for condition icon images (`<base>/<code>@4x.png`)
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,

    /// Per-request timeout. Unset means the HTTP client's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_weather_url() -> String {
    DEFAULT_WEATHER_URL.to_string()
}

fn default_icon_base_url() -> String {
    DEFAULT_ICON_BASE_URL.to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_url(),
            icon_base_url: default_icon_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl WeatherConfig {
    /// Check if an API key is present (not a placeholder)
    pub fn is_configured(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && !key.starts_with("YOUR_")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Whether the user allows the app to read the device position
    #[serde(default = "default_permission_granted")]
    pub permission_granted: bool,

    /// Fixed position used when no positioning service is available
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,

    /// Reverse geocoding endpoint (Nominatim-compatible)
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,
}

fn default_permission_granted() -> bool {
    true
}

// London
fn default_latitude() -> f64 {
    51.5074
}

fn default_longitude() -> f64 {
    -0.1278
}

fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            permission_granted: default_permission_granted(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            geocoder_url: default_geocoder_url(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nimbus")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults there if the file doesn't exist.
    ///
    /// Environment overrides are not applied here.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors; warnings are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Replace file values with environment-supplied ones.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                tracing::debug!("Using API key from {}", API_KEY_ENV);
                self.weather.api_key = key;
            }
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !self.weather.is_configured() {
            result.add_error(
                "weather.api_key",
                format!("API key is not set (config file or {})", API_KEY_ENV),
            );
        }

        Self::validate_url(&self.weather.base_url, "weather.base_url", &mut result);
        Self::validate_url(
            &self.weather.icon_base_url,
            "weather.icon_base_url",
            &mut result,
        );
        Self::validate_url(
            &self.location.geocoder_url,
            "location.geocoder_url",
            &mut result,
        );

        if self.weather.request_timeout_secs == Some(0) {
            result.add_error(
                "weather.request_timeout_secs",
                "Timeout must be greater than 0",
            );
        }

        if !(-90.0..=90.0).contains(&self.location.latitude) {
            result.add_error(
                "location.latitude",
                format!("Latitude out of range: {}", self.location.latitude),
            );
        }

        if !(-180.0..=180.0).contains(&self.location.longitude) {
            result.add_error(
                "location.longitude",
                format!("Longitude out of range: {}", self.location.longitude),
            );
        }

        if !self.location.permission_granted {
            result.add_warning(
                "location.permission_granted",
                "Location access denied - weather won't load until you search for a city",
            );
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("nimbus");

        Ok(config_dir.join("config.toml"))
    }
}
