//! Text rendering of the weather screen.
//!
//! Missing report fields render as empty strings rather than blocking the view.

use nimbus_weather::icon_url;

use crate::state::ScreenState;

pub const TITLE: &str = "Current Weather";
pub const SEARCH_PLACEHOLDER: &str = "Search by city name";

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Nothing to show yet
    Loading,
    Detail(DetailView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: &'static str,
    pub description: String,
    pub temperature: String,
    pub location: String,
    pub icon_url: Option<String>,
    pub search_text: String,
    pub is_refreshing: bool,
    pub is_searching: bool,
}

pub fn render(state: &ScreenState, icon_base_url: &str) -> Screen {
    if state.shows_loading_indicator() {
        return Screen::Loading;
    }

    let report = state.report.as_ref();

    let description = report
        .and_then(|r| r.description.as_deref())
        .map(capitalize_first)
        .unwrap_or_default();

    let temperature = format!(
        "Temperature: {}°C",
        report
            .and_then(|r| r.temperature_celsius)
            .map(|t| t.to_string())
            .unwrap_or_default()
    );

    let location = match &state.location_name {
        Some(name) => format!("Location: {}, {}", name.city, name.region),
        None => format!(
            "Location: {}",
            report
                .and_then(|r| r.fallback_name.as_deref())
                .unwrap_or_default()
        ),
    };

    Screen::Detail(DetailView {
        title: TITLE,
        description,
        temperature,
        location,
        icon_url: report
            .and_then(|r| r.icon_code.as_deref())
            .map(|code| icon_url(icon_base_url, code)),
        search_text: state.search_text.clone(),
        is_refreshing: state.is_refreshing,
        is_searching: state.is_searching,
    })
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Screen::Loading => writeln!(f, "Loading..."),
            Screen::Detail(view) => {
                if view.is_refreshing {
                    writeln!(f, "(refreshing)")?;
                }
                writeln!(f, "{}", view.title)?;
                writeln!(f, "{}", view.description)?;
                writeln!(f, "{}", view.temperature)?;
                writeln!(f, "{}", view.location)?;
                if let Some(url) = &view.icon_url {
                    writeln!(f, "Icon: {}", url)?;
                }
                if view.search_text.is_empty() {
                    writeln!(f, "[{}]", SEARCH_PLACEHOLDER)?;
                } else {
                    writeln!(f, "[{}]", view.search_text)?;
                }
                if view.is_searching {
                    writeln!(f, "Searching...")?;
                }
                Ok(())
            }
        }
    }
}
