use async_trait::async_trait;

use crate::geocode::NominatimGeocoder;
use crate::types::{Accuracy, Coordinates, LocationError, LocationName, Permission};

/// Device location service: permission, position fix and reverse geocoding.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_permission(&self) -> Permission;

    async fn current_coordinates(&self, accuracy: Accuracy) -> Result<Coordinates, LocationError>;

    /// Candidate place records for `coordinates`, best match first. May be empty.
    async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
    ) -> Result<Vec<LocationName>, LocationError>;
}

/// Location provider backed by a fixed position from configuration.
///
/// Used on hosts without a positioning service. The permission answer is
/// configured too, so denial behaves exactly like a refused system prompt.
#[derive(Debug, Clone)]
pub struct ConfiguredLocationProvider {
    permission: Permission,
    coordinates: Coordinates,
    geocoder: NominatimGeocoder,
}

impl ConfiguredLocationProvider {
    pub fn new(permission: Permission, coordinates: Coordinates, geocoder: NominatimGeocoder) -> Self {
        Self {
            permission,
            coordinates,
            geocoder,
        }
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocationProvider {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn current_coordinates(&self, accuracy: Accuracy) -> Result<Coordinates, LocationError> {
        if !self.permission.is_granted() {
            return Err(LocationError::PermissionDenied);
        }
        tracing::debug!("Configured position requested ({:?} accuracy)", accuracy);
        Ok(self.coordinates)
    }

    async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
    ) -> Result<Vec<LocationName>, LocationError> {
        self.geocoder.reverse(coordinates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::NOMINATIM_URL;

    fn provider(permission: Permission) -> ConfiguredLocationProvider {
        ConfiguredLocationProvider::new(
            permission,
            Coordinates::new(51.5074, -0.1278),
            NominatimGeocoder::new(NOMINATIM_URL).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_granted_returns_configured_position() {
        let p = provider(Permission::Granted);
        assert_eq!(p.request_permission().await, Permission::Granted);
        let coords = p.current_coordinates(Accuracy::Highest).await.unwrap();
        assert_eq!(coords, Coordinates::new(51.5074, -0.1278));
    }

    #[tokio::test]
    async fn test_denied_withholds_position() {
        let p = provider(Permission::Denied);
        assert_eq!(p.request_permission().await, Permission::Denied);
        let err = p.current_coordinates(Accuracy::Highest).await.unwrap_err();
        assert!(matches!(err, LocationError::PermissionDenied));
    }
}
