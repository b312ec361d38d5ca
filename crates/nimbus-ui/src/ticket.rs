//! Request tickets for the weather screen.
//!
//! Each operation takes a ticket when it starts. A result is applied to a
//! state slice only if its ticket is still the newest one for that slice,
//! so a slow response can never overwrite what a newer request produced.

/// Identity of one started operation. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Newest ticket per state slice and per busy flag.
#[derive(Debug, Default)]
pub struct RequestFence {
    issued: u64,
    locate: Option<Ticket>,
    report: Option<Ticket>,
    place: Option<Ticket>,
    refresh: Option<Ticket>,
    search: Option<Ticket>,
}

impl RequestFence {
    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Start a coordinate-based load. It owns both the report and place slices.
    pub fn begin_locate(&mut self, is_refresh: bool) -> Ticket {
        let ticket = self.issue();
        self.locate = Some(ticket);
        self.report = Some(ticket);
        self.place = Some(ticket);
        if is_refresh {
            self.refresh = Some(ticket);
        }
        ticket
    }

    /// Start a search by city name. It owns the report slice only; the place
    /// slice is claimed once the search succeeds.
    pub fn begin_search(&mut self) -> Ticket {
        let ticket = self.issue();
        self.report = Some(ticket);
        self.search = Some(ticket);
        ticket
    }

    /// True if `ticket` is the newest location lookup, whoever owns the report.
    pub fn is_current_locate(&self, ticket: Ticket) -> bool {
        self.locate == Some(ticket)
    }

    pub fn is_current_report(&self, ticket: Ticket) -> bool {
        self.report == Some(ticket)
    }

    pub fn is_current_place(&self, ticket: Ticket) -> bool {
        self.place == Some(ticket)
    }

    /// Hand the place slice to `ticket`, fencing out older geocode results.
    pub fn claim_place(&mut self, ticket: Ticket) {
        self.place = Some(ticket);
    }

    /// True if `ticket` was the newest refresh, which is now over.
    pub fn finish_refresh(&mut self, ticket: Ticket) -> bool {
        if self.refresh == Some(ticket) {
            self.refresh = None;
            true
        } else {
            false
        }
    }

    /// True if `ticket` was the newest search, which is now over.
    pub fn finish_search(&mut self, ticket: Ticket) -> bool {
        if self.search == Some(ticket) {
            self.search = None;
            true
        } else {
            false
        }
    }
}
