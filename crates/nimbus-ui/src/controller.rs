//! Weather screen controller.
//!
//! Mediates between user actions, the weather API and the location service.
//! Operations spawn tasks and return immediately; results come back as
//! [`ScreenMessage`]s and are applied on the controller's own task by
//! [`poll`](WeatherScreenController::poll), [`next`](WeatherScreenController::next)
//! or [`settle`](WeatherScreenController::settle). Each result touches only
//! its own slice of [`ScreenState`], in arrival order.

use std::sync::Arc;

use nimbus_weather::{LocationError, LocationProvider, WeatherApi, WeatherError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error_mapping;
use crate::service::{self, FetchOrigin, ReportQuery, ScreenMessage, TaskKind};
use crate::state::{Notice, ScreenState};
use crate::ticket::{RequestFence, Ticket};

pub struct WeatherScreenController {
    state: ScreenState,
    weather: Arc<dyn WeatherApi>,
    location: Arc<dyn LocationProvider>,
    tx: UnboundedSender<ScreenMessage>,
    rx: UnboundedReceiver<ScreenMessage>,
    fence: RequestFence,
    in_flight: usize,
    mounted: bool,
    notices: Vec<Notice>,
}

impl WeatherScreenController {
    pub fn new(weather: Arc<dyn WeatherApi>, location: Arc<dyn LocationProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: ScreenState::default(),
            weather,
            location,
            tx,
            rx,
            fence: RequestFence::default(),
            in_flight: 0,
            mounted: false,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Number of spawned tasks that have not reported back yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Alerts raised since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Load weather for the current location. Runs once per screen.
    pub fn initialize(&mut self) {
        if self.mounted {
            tracing::warn!("Weather screen already initialized");
            return;
        }
        self.mounted = true;
        tracing::info!("Weather screen mounted");

        let ticket = self.fence.begin_locate(false);
        self.start_locate(ticket);
    }

    /// Re-run the current-location load. `is_refreshing` stays set until it ends.
    pub fn refresh(&mut self) {
        let ticket = self.fence.begin_locate(true);
        self.state.is_refreshing = true;
        tracing::info!("Refreshing weather for current location");
        self.start_locate(ticket);
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.state.search_text = text.into();
    }

    /// Search for the city currently typed into the search box.
    pub fn submit_search(&mut self) -> bool {
        let query = self.state.search_text.clone();
        self.search(&query)
    }

    /// Fetch weather for a city by name. Blank queries are ignored.
    ///
    /// Returns whether a request was started.
    pub fn search(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        let ticket = self.fence.begin_search();
        self.state.is_searching = true;
        tracing::info!("Searching weather for {:?}", query);

        self.in_flight += 1;
        service::request_report(
            &self.tx,
            self.weather.clone(),
            ticket,
            ReportQuery::CityName(query.to_string()),
        );
        true
    }

    /// Apply every result that has already arrived, without waiting.
    ///
    /// Returns the number of messages applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
            applied += 1;
        }
        applied
    }

    /// Wait for the next result and apply it.
    ///
    /// Returns false immediately when nothing is in flight.
    pub async fn next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(message) => {
                self.apply(message);
                true
            }
            None => false,
        }
    }

    /// Apply results until no task is left in flight.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    fn start_locate(&mut self, ticket: Ticket) {
        self.in_flight += 1;
        service::request_locate(&self.tx, self.location.clone(), ticket);
    }

    fn apply(&mut self, message: ScreenMessage) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match message {
            ScreenMessage::Located { ticket, result } => self.on_located(ticket, result),
            ScreenMessage::ReportLoaded {
                ticket,
                origin,
                result,
            } => self.on_report(ticket, origin, result),
            ScreenMessage::PlaceResolved { ticket, result } => {
                if !self.fence.is_current_place(ticket) {
                    tracing::debug!("Discarding stale place for {:?}", ticket);
                    return;
                }
                match result {
                    Ok(names) => {
                        // Only the best candidate is shown; none leaves the API name in place
                        if let Some(name) = names.into_iter().next() {
                            self.state.location_name = Some(name);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Reverse geocoding failed: {}", error_mapping::location_error(e));
                    }
                }
            }
            ScreenMessage::Aborted { ticket, task } => self.on_aborted(ticket, task),
        }
    }

    fn on_located(
        &mut self,
        ticket: Ticket,
        result: Result<nimbus_weather::Coordinates, LocationError>,
    ) {
        let coordinates = match result {
            Ok(coordinates) => coordinates,
            Err(e) => {
                let notice = match e {
                    LocationError::PermissionDenied => Notice::PermissionDenied,
                    _ => Notice::LocationUnavailable,
                };
                tracing::warn!("Location lookup failed: {}", error_mapping::location_error(e));
                if self.fence.is_current_locate(ticket) {
                    self.notify(notice);
                }
                self.end_refresh(ticket);
                return;
            }
        };

        // Report and place are independent: neither waits for the other
        if self.fence.is_current_report(ticket) {
            self.in_flight += 1;
            service::request_report(
                &self.tx,
                self.weather.clone(),
                ticket,
                ReportQuery::Coordinates(coordinates),
            );
        } else {
            tracing::debug!("Skipping superseded weather load for {:?}", ticket);
            self.end_refresh(ticket);
        }

        if self.fence.is_current_place(ticket) {
            self.in_flight += 1;
            service::request_place(&self.tx, self.location.clone(), ticket, coordinates);
        }
    }

    fn on_report(
        &mut self,
        ticket: Ticket,
        origin: FetchOrigin,
        result: Result<nimbus_weather::WeatherReport, WeatherError>,
    ) {
        if self.fence.is_current_report(ticket) {
            match result {
                Ok(report) => {
                    tracing::info!("Weather report loaded ({:?})", origin);
                    self.state.report = Some(report);
                    if origin == FetchOrigin::Search {
                        // Fall back to the name the API echoed for the city
                        self.state.location_name = None;
                        self.fence.claim_place(ticket);
                    }
                }
                Err(e) => {
                    let notice = match (origin, e.is_status()) {
                        (FetchOrigin::Coordinates, true) => Notice::SomethingWentWrong,
                        (FetchOrigin::Coordinates, false) => Notice::RequestFailed,
                        (FetchOrigin::Search, true) => Notice::CityNotFound,
                        (FetchOrigin::Search, false) => Notice::SearchFailed,
                    };
                    tracing::warn!(
                        "Weather fetch failed: {}",
                        error_mapping::weather_error(e, origin)
                    );
                    self.notify(notice);
                }
            }
        } else {
            tracing::debug!("Discarding stale report for {:?}", ticket);
        }

        match origin {
            FetchOrigin::Coordinates => self.end_refresh(ticket),
            FetchOrigin::Search => self.end_search(ticket),
        }
    }

    fn on_aborted(&mut self, ticket: Ticket, task: TaskKind) {
        let current = self.fence.is_current_report(ticket);
        match task {
            TaskKind::Locate => {
                if self.fence.is_current_locate(ticket) {
                    self.notify(Notice::LocationUnavailable);
                }
                self.end_refresh(ticket);
            }
            TaskKind::Report(FetchOrigin::Coordinates) => {
                if current {
                    self.notify(Notice::RequestFailed);
                }
                self.end_refresh(ticket);
            }
            TaskKind::Report(FetchOrigin::Search) => {
                if current {
                    self.notify(Notice::SearchFailed);
                }
                self.end_search(ticket);
            }
            TaskKind::Place => {}
        }
    }

    fn end_refresh(&mut self, ticket: Ticket) {
        if self.fence.finish_refresh(ticket) {
            self.state.is_refreshing = false;
        }
    }

    fn end_search(&mut self, ticket: Ticket) {
        if self.fence.finish_search(ticket) {
            self.state.is_searching = false;
        }
    }

    fn notify(&mut self, notice: Notice) {
        tracing::warn!("Alert: {}", notice);
        self.notices.push(notice);
    }
}
