//! Search/filter/pagination state for the person list.
//!
//! # Design
//! `ListQuery` does no I/O by itself. A fetch is started with `begin_fetch`,
//! which hands out a `FetchTicket` stamped with a generation number, and is
//! finished with `complete`. Only the ticket from the most recent
//! `begin_fetch` may commit, so a slow response for an old filter set can
//! never overwrite the rows of a newer one. Failures are fail-soft: the list
//! shows zero rows and a total of zero instead of surfacing the error.

use std::fmt;

use crate::api::PersonApi;
use crate::error::FetchError;
use crate::transport::Transport;
use crate::types::{ListResponse, Person, PersonStatus, SearchParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Proof that a fetch was started; pass it back to `complete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    params: SearchParams,
}

impl FetchTicket {
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub struct ListQuery {
    params: SearchParams,
    state: LoadState,
    persons: Vec<Person>,
    total: u64,
    error: Option<String>,
    generation: u64,
    stale: bool,
    closed: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::with_params(SearchParams::default())
    }

    pub fn with_params(params: SearchParams) -> Self {
        Self {
            params: normalize(params),
            state: LoadState::Idle,
            persons: Vec::new(),
            total: 0,
            error: None,
            generation: 0,
            stale: true,
            closed: false,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Message of the last failed fetch, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True when params changed (or a reload was asked for) since the last
    /// `begin_fetch`.
    pub fn needs_fetch(&self) -> bool {
        self.stale && !self.closed
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = non_empty(keyword.into());
        self.update(|p| {
            p.keyword = keyword;
            p.page = 1;
        });
    }

    pub fn set_department(&mut self, department: Option<String>) {
        let department = department.and_then(non_empty);
        self.update(|p| {
            p.department = department;
            p.page = 1;
        });
    }

    pub fn set_status(&mut self, status: Option<PersonStatus>) {
        self.update(|p| {
            p.status = status;
            p.page = 1;
        });
    }

    /// A zero page size is ignored.
    pub fn set_page_size(&mut self, page_size: u32) {
        if page_size == 0 {
            log::warn!("ignoring page size 0");
            return;
        }
        self.update(|p| {
            p.page_size = page_size;
            p.page = 1;
        });
    }

    /// Changes only the page; filters are kept. Pages are 1-based, 0 is
    /// clamped to 1.
    pub fn set_page(&mut self, page: u32) {
        self.update(|p| p.page = page.max(1));
    }

    pub fn next_page(&mut self) {
        if self.pagination().has_next {
            let page = self.params.page.saturating_add(1);
            self.set_page(page);
        }
    }

    pub fn prev_page(&mut self) {
        if self.pagination().has_prev {
            let page = self.params.page - 1;
            self.set_page(page);
        }
    }

    pub fn reset_filters(&mut self) {
        self.update(|p| *p = SearchParams::default());
    }

    /// Schedules a refetch with unchanged params.
    pub fn reload(&mut self) {
        self.stale = true;
    }

    /// Enters `Loading` and returns the ticket for the new fetch. Any ticket
    /// handed out earlier becomes stale. Returns `None` once closed.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.closed {
            return None;
        }
        self.generation += 1;
        self.stale = false;
        self.state = LoadState::Loading;
        Some(FetchTicket {
            generation: self.generation,
            params: self.params.clone(),
        })
    }

    /// Commits the outcome of the fetch identified by `ticket`. Returns
    /// `false` and leaves state untouched when the ticket is outdated or the
    /// query has been closed.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<ListResponse, FetchError>,
    ) -> bool {
        if self.closed {
            log::debug!("list closed, dropping result of fetch #{}", ticket.generation);
            return false;
        }
        if ticket.generation != self.generation {
            log::debug!(
                "dropping stale list result #{} (latest is #{})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(response) => {
                self.persons = response.data;
                self.total = response.total;
                self.error = None;
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                log::warn!("person list fetch failed: {err}");
                let empty = ListResponse::empty(&ticket.params);
                self.persons = empty.data;
                self.total = empty.total;
                self.error = Some(err.to_string());
                self.state = LoadState::Failed;
            }
        }
        true
    }

    /// Runs one fetch for the current params through `api`.
    pub fn refresh<T: Transport>(&mut self, api: &PersonApi<T>) -> bool {
        match self.begin_fetch() {
            Some(ticket) => {
                let result = api.get_list(ticket.params());
                self.complete(ticket, result)
            }
            None => false,
        }
    }

    /// Fetches only if something changed since the last fetch.
    pub fn refresh_if_needed<T: Transport>(&mut self, api: &PersonApi<T>) -> bool {
        self.needs_fetch() && self.refresh(api)
    }

    /// The view went away; results arriving afterwards are ignored.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.params.page, self.params.page_size, self.total)
    }

    /// Rows from the previous params stay visible, but the state drops back
    /// to `Idle` until the next fetch begins.
    fn update(&mut self, change: impl FnOnce(&mut SearchParams)) {
        let mut next = self.params.clone();
        change(&mut next);
        if next != self.params {
            self.params = next;
            self.stale = true;
            if self.state != LoadState::Loading {
                self.state = LoadState::Idle;
            }
        }
    }
}

/// Pagination bounds derived from page, page size and total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub has_prev: bool,
    pub has_next: bool,
    /// 1-based index of the first row shown, 0 when `total` is 0.
    pub first: u64,
    /// 1-based index of the last row shown, 0 when `total` is 0.
    pub last: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let end = u64::from(page).saturating_mul(u64::from(page_size));
        let start = end - u64::from(page_size) + 1;
        let (first, last) = if total == 0 {
            (0, 0)
        } else {
            (start.min(total), end.min(total))
        };
        Self {
            page,
            page_size,
            total,
            has_prev: page > 1,
            has_next: end < total,
            first,
            last,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size))
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} of {}", self.first, self.last, self.total)
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn normalize(mut params: SearchParams) -> SearchParams {
    params.keyword = params.keyword.and_then(non_empty);
    params.department = params.department.and_then(non_empty);
    params.page = params.page.max(1);
    if params.page_size == 0 {
        params.page_size = SearchParams::default().page_size;
    }
    params
}
