//! Weather data for Nimbus
//!
//! Current conditions from the OpenWeatherMap API, plus the device-location
//! seam (permission, position, reverse geocoding) the screen depends on.

pub mod client;
pub mod geocode;
pub mod location;
pub mod types;

pub use client::{icon_url, OpenWeatherClient, WeatherApi, WeatherClientConfig};
pub use geocode::NominatimGeocoder;
pub use location::{ConfiguredLocationProvider, LocationProvider};
pub use types::*;
