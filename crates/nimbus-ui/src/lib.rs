//! The weather screen: controller, state and rendering.

pub mod app;
pub mod controller;
pub mod error_mapping;
pub mod service;
pub mod state;
pub mod ticket;
pub mod view;

pub use app::WeatherScreen;
pub use controller::WeatherScreenController;
pub use state::{Notice, ScreenState};
pub use view::{render, DetailView, Screen};
