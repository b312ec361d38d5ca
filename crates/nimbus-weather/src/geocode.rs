//! Reverse geocoding: convert coordinates to a city and region.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Coordinates, LocationError, LocationName};

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const USER_AGENT: &str = concat!("nimbus/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state_district: Option<String>,
    state: Option<String>,
    county: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    fn into_location_name(self) -> Option<LocationName> {
        // Prefer city > town > village > municipality for the primary place name
        let city = self
            .city
            .or(self.town)
            .or(self.village)
            .or(self.municipality)?;

        let region = self
            .state
            .or(self.state_district)
            .or(self.county)
            .or(self.country)
            .unwrap_or_default();

        Some(LocationName { city, region })
    }
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str) -> Result<Self, LocationError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LocationError::Geocode(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Look up place candidates for `coordinates`, best match first.
    ///
    /// An empty list means the service knows no named place there.
    #[instrument(skip(self), level = "debug")]
    pub async fn reverse(
        &self,
        coordinates: Coordinates,
    ) -> Result<Vec<LocationName>, LocationError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("zoom", "10".to_string()),
            ])
            .send()
            .await
            .map_err(|e| LocationError::Geocode(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LocationError::Geocode(format!(
                "status {}",
                response.status()
            )));
        }

        let body: NominatimResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Geocode(e.to_string()))?;

        let names: Vec<LocationName> = body
            .address
            .and_then(NominatimAddress::into_location_name)
            .into_iter()
            .collect();

        if let Some(first) = names.first() {
            tracing::info!("Reverse geocoded to: {}", first);
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(json: serde_json::Value) -> NominatimAddress {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_city_preferred_over_town() {
        let name = address(serde_json::json!({
            "city": "Seattle",
            "town": "Shoreline",
            "state": "Washington",
            "country": "United States"
        }))
        .into_location_name()
        .unwrap();
        assert_eq!(name.city, "Seattle");
        assert_eq!(name.region, "Washington");
    }

    #[test]
    fn test_village_with_country_only() {
        let name = address(serde_json::json!({
            "village": "Hallstatt",
            "country": "Austria"
        }))
        .into_location_name()
        .unwrap();
        assert_eq!(name.city, "Hallstatt");
        assert_eq!(name.region, "Austria");
    }

    #[test]
    fn test_no_place_name() {
        let name = address(serde_json::json!({
            "state": "Nevada",
            "country": "United States"
        }))
        .into_location_name();
        assert!(name.is_none());
    }

    #[tokio::test]
    #[ignore] // Hits the public Nominatim service: cargo test -p nimbus-weather -- --ignored
    async fn test_reverse_geocode_seattle() {
        let geocoder = NominatimGeocoder::new(NOMINATIM_URL).unwrap();
        let names = geocoder
            .reverse(Coordinates::new(47.6062, -122.3321))
            .await
            .unwrap();
        assert!(names[0].city.to_lowercase().contains("seattle"));
    }
}
