/// Geographic position reported by the location service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Human-readable place for a set of coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationName {
    pub city: String,
    pub region: String,
}

impl std::fmt::Display for LocationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.city, self.region)
    }
}

/// Outcome of asking the user for location access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    pub fn is_granted(self) -> bool {
        matches!(self, Permission::Granted)
    }
}

/// Requested precision for a position fix. The screen always asks for the best.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Accuracy {
    Highest,
}

/// Snapshot of current conditions as returned by the weather API.
///
/// Fields are optional because the payload is not validated: whatever the
/// API left out renders as blank text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReport {
    pub description: Option<String>,
    pub temperature_celsius: Option<f64>,
    pub icon_code: Option<String>,
    /// Place name echoed back by the API, shown when no reverse-geocoded name exists
    pub fallback_name: Option<String>,
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Reverse geocoding failed: {0}")]
    Geocode(String),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API returned status {status}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// True when the API answered with a non-success status
    pub fn is_status(&self) -> bool {
        matches!(self, WeatherError::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_name_display() {
        let name = LocationName {
            city: "Seattle".to_string(),
            region: "Washington".to_string(),
        };
        assert_eq!(name.to_string(), "Seattle, Washington");
    }

    #[test]
    fn test_permission_granted() {
        assert!(Permission::Granted.is_granted());
        assert!(!Permission::Denied.is_granted());
    }

    #[test]
    fn test_status_error_display() {
        let err = WeatherError::Status {
            status: 404,
            body: r#"{"cod":"404","message":"city not found"}"#.to_string(),
        };
        assert!(err.is_status());
        assert_eq!(err.to_string(), "Weather API returned status 404");
        assert!(!WeatherError::Parse("eof".into()).is_status());
    }
}
