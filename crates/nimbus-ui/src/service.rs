//! Weather screen backend: async location and weather requests.
//! Work runs on spawned tasks; each task reports back exactly once via mpsc.

use std::future::Future;
use std::sync::Arc;

use nimbus_weather::{
    Accuracy, Coordinates, LocationError, LocationName, LocationProvider, Permission, WeatherApi,
    WeatherError, WeatherReport,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::ticket::Ticket;

/// Which flow asked for a report. Decides the alert text on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    Coordinates,
    Search,
}

/// What a report request looks up.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportQuery {
    Coordinates(Coordinates),
    CityName(String),
}

impl ReportQuery {
    pub fn origin(&self) -> FetchOrigin {
        match self {
            ReportQuery::Coordinates(_) => FetchOrigin::Coordinates,
            ReportQuery::CityName(_) => FetchOrigin::Search,
        }
    }
}

/// Kind of spawned task, used when a task dies without reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Locate,
    Report(FetchOrigin),
    Place,
}

/// Messages sent from async operations back to the controller
#[derive(Debug)]
pub enum ScreenMessage {
    /// Permission check and position fix finished
    Located {
        ticket: Ticket,
        result: Result<Coordinates, LocationError>,
    },
    /// Weather fetch finished
    ReportLoaded {
        ticket: Ticket,
        origin: FetchOrigin,
        result: Result<WeatherReport, WeatherError>,
    },
    /// Reverse geocoding finished
    PlaceResolved {
        ticket: Ticket,
        result: Result<Vec<LocationName>, LocationError>,
    },
    /// Task panicked or was cancelled before reporting
    Aborted { ticket: Ticket, task: TaskKind },
}

fn spawn_reporting<F>(tx: &UnboundedSender<ScreenMessage>, ticket: Ticket, task: TaskKind, work: F)
where
    F: Future<Output = ScreenMessage> + Send + 'static,
{
    let tx = tx.clone();
    let handle = tokio::spawn(work);

    tokio::spawn(async move {
        let message = match handle.await {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("{:?} task for {:?} died: {}", task, ticket, e);
                ScreenMessage::Aborted { ticket, task }
            }
        };
        // Receiver gone means the screen was dropped
        let _ = tx.send(message);
    });
}

/// Ask for location permission, then for the most accurate position available.
/// Sends `Located`.
pub fn request_locate(
    tx: &UnboundedSender<ScreenMessage>,
    location: Arc<dyn LocationProvider>,
    ticket: Ticket,
) {
    spawn_reporting(tx, ticket, TaskKind::Locate, async move {
        let result = match location.request_permission().await {
            Permission::Denied => Err(LocationError::PermissionDenied),
            Permission::Granted => location.current_coordinates(Accuracy::Highest).await,
        };
        if let Ok(coords) = &result {
            tracing::info!("Got location: {}, {}", coords.latitude, coords.longitude);
        }
        ScreenMessage::Located { ticket, result }
    });
}

/// Fetch a weather report. Sends `ReportLoaded`.
pub fn request_report(
    tx: &UnboundedSender<ScreenMessage>,
    weather: Arc<dyn WeatherApi>,
    ticket: Ticket,
    query: ReportQuery,
) {
    let origin = query.origin();
    spawn_reporting(tx, ticket, TaskKind::Report(origin), async move {
        let result = match &query {
            ReportQuery::Coordinates(coords) => weather.fetch_by_coordinates(*coords).await,
            ReportQuery::CityName(name) => weather.fetch_by_city_name(name).await,
        };
        ScreenMessage::ReportLoaded {
            ticket,
            origin,
            result,
        }
    });
}

/// Reverse geocode a position. Sends `PlaceResolved`.
pub fn request_place(
    tx: &UnboundedSender<ScreenMessage>,
    location: Arc<dyn LocationProvider>,
    ticket: Ticket,
    coordinates: Coordinates,
) {
    spawn_reporting(tx, ticket, TaskKind::Place, async move {
        let result = location.reverse_geocode(coordinates).await;
        ScreenMessage::PlaceResolved { ticket, result }
    });
}
