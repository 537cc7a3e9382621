//! Single-person fetch state keyed by identifier.
//!
//! Uses the same ticket/generation scheme as `ListQuery`. Unlike the list, a
//! failure is surfaced: the view shows an error with a way back to the list
//! and never exposes a half-loaded person.

use crate::api::PersonApi;
use crate::error::FetchError;
use crate::transport::Transport;
use crate::types::{DetailResponse, Person};

pub const DETAIL_FAILED: &str = "failed to fetch person detail";
pub const DETAIL_NOT_FOUND: &str = "person not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Idle,
    Loading,
    Loaded(Person),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    generation: u64,
    id: String,
}

impl DetailTicket {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug)]
pub struct DetailView {
    id: Option<String>,
    state: DetailState,
    generation: u64,
    stale: bool,
    closed: bool,
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            id: None,
            state: DetailState::Idle,
            generation: 0,
            stale: false,
            closed: false,
        }
    }

    pub fn for_id(id: impl Into<String>) -> Self {
        let mut view = Self::new();
        view.set_id(id);
        view
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn person(&self) -> Option<&Person> {
        match &self.state {
            DetailState::Loaded(person) => Some(person),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            DetailState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Navigation away from a failed view goes through "back to list" or a
    /// retry only.
    pub fn can_navigate(&self) -> bool {
        !matches!(self.state, DetailState::Failed(_))
    }

    pub fn needs_fetch(&self) -> bool {
        self.stale && !self.closed && self.id.is_some()
    }

    /// Switches to another person. Empty ids are ignored; the same id does
    /// not schedule a fetch. A new id drops whatever the view was showing, so
    /// `person()` never answers for a different id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if id.is_empty() || self.id.as_deref() == Some(id.as_str()) {
            return;
        }
        self.id = Some(id);
        self.state = DetailState::Idle;
        self.stale = true;
    }

    pub fn retry(&mut self) {
        self.stale = true;
    }

    pub fn begin_fetch(&mut self) -> Option<DetailTicket> {
        if self.closed {
            return None;
        }
        let id = self.id.clone()?;
        self.generation += 1;
        self.stale = false;
        self.state = DetailState::Loading;
        Some(DetailTicket {
            generation: self.generation,
            id,
        })
    }

    /// Commits the fetch identified by `ticket`; outdated tickets and late
    /// results after `close` are dropped.
    pub fn complete(
        &mut self,
        ticket: DetailTicket,
        result: Result<DetailResponse, FetchError>,
    ) -> bool {
        if self.closed || ticket.generation != self.generation {
            log::debug!("dropping detail result for {} (#{})", ticket.id, ticket.generation);
            return false;
        }
        self.state = match result {
            Ok(response) => DetailState::Loaded(response.data),
            Err(err) => {
                log::error!("{DETAIL_FAILED} for {}: {err}", ticket.id);
                let message = if err.is_not_found() {
                    DETAIL_NOT_FOUND
                } else {
                    DETAIL_FAILED
                };
                DetailState::Failed(message.to_string())
            }
        };
        true
    }

    pub fn refresh<T: Transport>(&mut self, api: &PersonApi<T>) -> bool {
        match self.begin_fetch() {
            Some(ticket) => {
                let result = api.get_detail(ticket.id());
                self.complete(ticket, result)
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }
}
