//! Maps weather-crate errors to nimbus_core::AppError for diagnostics.

use nimbus_core::{AppError, ReqwestErrorExt};
use nimbus_weather::{LocationError, WeatherError};

use crate::service::FetchOrigin;

pub fn weather_error(err: WeatherError, origin: FetchOrigin) -> AppError {
    use nimbus_core::WeatherError as Core;

    match err {
        WeatherError::Network(e) => AppError::Network(e.into_network_error()),
        WeatherError::Status { status: 401, .. } => AppError::Weather(Core::InvalidApiKey),
        WeatherError::Status { status, body } => match origin {
            FetchOrigin::Search => {
                AppError::Weather(Core::LocationNotFound(format!("status {}: {}", status, body)))
            }
            FetchOrigin::Coordinates => {
                AppError::Weather(Core::ApiError(format!("status {}: {}", status, body)))
            }
        },
        WeatherError::Parse(msg) => AppError::Weather(Core::Malformed(msg)),
    }
}

pub fn location_error(err: LocationError) -> AppError {
    use nimbus_core::LocationError as Core;

    match err {
        LocationError::PermissionDenied => AppError::Location(Core::PermissionDenied),
        LocationError::ServiceUnavailable => {
            AppError::Location(Core::Unavailable("service unavailable".to_string()))
        }
        LocationError::Geocode(msg) => AppError::Location(Core::Unavailable(msg)),
    }
}
