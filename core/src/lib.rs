//! Synchronous client core for the personnel service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values
//! (`PersonClient`), executes them through a pluggable `Transport` with
//! interceptor hooks (`PersonApi`), and drives the list and detail views
//! (`ListQuery`, `DetailView`) without owning any I/O of their own.
//!
//! # Design
//! - `PersonClient` is stateless, it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and every operation is testable offline.
//! - `PersonApi` is an ordinary value passed to its users; there is no
//!   process-wide client.
//! - View state machines hand out generation-stamped tickets so only the
//!   latest fetch can commit.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod list;
pub mod transport;
pub mod types;

pub use api::PersonApi;
pub use client::PersonClient;
pub use config::ApiConfig;
pub use detail::{DetailState, DetailView};
pub use error::{ApiError, FetchError, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interceptor::{BearerAuth, Interceptor, LoggingInterceptor};
pub use list::{FetchTicket, ListQuery, LoadState, Pagination};
pub use transport::{Transport, UreqTransport};
pub use types::{
    BatchDeleteRequest, DetailResponse, ListResponse, NewPerson, OperationResult, Person,
    PersonPatch, PersonStatus, SearchParams,
};
