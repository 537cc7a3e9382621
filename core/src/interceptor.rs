//! Request and response hooks run by `PersonApi` around every round-trip.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Cross-cutting observer of requests, responses and classified errors.
///
/// Hooks cannot swallow failures: `PersonApi` always propagates the error
/// after `on_error` has run, so implementations only observe or decorate.
pub trait Interceptor: Send + Sync {
    fn on_request(&self, _request: &mut HttpRequest) {}

    fn on_response(&self, _request: &HttpRequest, _response: &HttpResponse) {}

    fn on_error(&self, _request: &HttpRequest, _error: &ApiError) {}
}

/// Logs method and path of every request, status of every response and the
/// classification of every failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInterceptor;

impl Interceptor for LoggingInterceptor {
    fn on_request(&self, request: &mut HttpRequest) {
        log::info!("API request: {} {}", request.method, request.path);
    }

    fn on_response(&self, request: &HttpRequest, response: &HttpResponse) {
        log::info!("API response: {} {}", response.status, request.path);
    }

    fn on_error(&self, request: &HttpRequest, error: &ApiError) {
        match error {
            ApiError::Unauthorized { .. } => {
                log::error!("unauthorized access to {}, log in again", request.path)
            }
            ApiError::ServerError { .. } => {
                log::error!("internal server error on {}", request.path)
            }
            other => log::error!(
                "API error: {:?} {} {}: {}",
                other.status(),
                request.method,
                request.path,
                other
            ),
        }
    }
}

/// Attaches `authorization: Bearer <token>` to outgoing requests.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Interceptor for BearerAuth {
    fn on_request(&self, request: &mut HttpRequest) {
        request
            .headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case("authorization"));
        request
            .headers
            .push(("authorization".to_string(), format!("Bearer {}", self.token)));
    }
}
