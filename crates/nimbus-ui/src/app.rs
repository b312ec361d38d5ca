use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use nimbus_core::Config;
use nimbus_weather::{
    ConfiguredLocationProvider, Coordinates, NominatimGeocoder, OpenWeatherClient, Permission,
    WeatherClientConfig,
};

use crate::controller::WeatherScreenController;
use crate::view::{self, Screen};

/// The weather screen wired to real services from configuration.
pub struct WeatherScreen {
    controller: WeatherScreenController,
    icon_base_url: String,
}

impl WeatherScreen {
    pub fn from_config(config: &Config) -> Result<Self> {
        let weather = OpenWeatherClient::new(WeatherClientConfig {
            base_url: config.weather.base_url.clone(),
            api_key: config.weather.api_key.clone(),
            timeout: config.weather.request_timeout_secs.map(Duration::from_secs),
        })?;

        let permission = if config.location.permission_granted {
            Permission::Granted
        } else {
            Permission::Denied
        };
        let location = ConfiguredLocationProvider::new(
            permission,
            Coordinates::new(config.location.latitude, config.location.longitude),
            NominatimGeocoder::new(&config.location.geocoder_url)?,
        );

        tracing::info!("Weather screen services created");
        Ok(Self {
            controller: WeatherScreenController::new(Arc::new(weather), Arc::new(location)),
            icon_base_url: config.weather.icon_base_url.clone(),
        })
    }

    pub fn controller(&self) -> &WeatherScreenController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut WeatherScreenController {
        &mut self.controller
    }

    pub fn render(&self) -> Screen {
        view::render(self.controller.state(), &self.icon_base_url)
    }
}
