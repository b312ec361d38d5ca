use nimbus_weather::{LocationName, WeatherReport};

/// Everything the weather screen renders. Owned and mutated by the controller only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState {
    /// Latest report; replaced wholesale on every successful fetch
    pub report: Option<WeatherReport>,
    /// Reverse-geocoded place, cleared by a successful city search
    pub location_name: Option<LocationName>,
    pub is_refreshing: bool,
    pub is_searching: bool,
    pub search_text: String,
}

impl ScreenState {
    /// The full-screen loading indicator shows until there is something to display.
    pub fn shows_loading_indicator(&self) -> bool {
        self.report.is_none() && !self.is_searching
    }
}

/// User-facing alert raised by a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    PermissionDenied,
    LocationUnavailable,
    /// Coordinate load answered with a non-success status
    SomethingWentWrong,
    /// Coordinate load failed in transport or parsing
    RequestFailed,
    /// Search answered with a non-success status
    CityNotFound,
    /// Search failed in transport or parsing
    SearchFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::PermissionDenied => "Permission to access location was denied",
            Notice::LocationUnavailable => "Unable to determine your location",
            Notice::SomethingWentWrong => "Something went wrong",
            Notice::RequestFailed => "An error occurred",
            Notice::CityNotFound => "City not found",
            Notice::SearchFailed => "An error occurred while searching",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
