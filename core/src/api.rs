//! Resource functions for the person API.
//!
//! # Design
//! `PersonApi` owns a `PersonClient`, a `Transport` and an interceptor chain.
//! It is constructed explicitly and handed to whatever needs it, so tests
//! can swap in a fake transport. Each operation performs exactly one HTTP
//! call and turns any failure into a `FetchError` carrying the operation's
//! fixed user message.

use crate::client::{check_status, PersonClient};
use crate::config::ApiConfig;
use crate::error::{ApiError, FetchError, Operation};
use crate::http::{HttpRequest, HttpResponse};
use crate::interceptor::{Interceptor, LoggingInterceptor};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    DetailResponse, ListResponse, NewPerson, OperationResult, PersonPatch, SearchParams,
};

pub struct PersonApi<T> {
    client: PersonClient,
    transport: T,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl PersonApi<UreqTransport> {
    /// Real HTTP client built from `config`.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(
            PersonClient::new(&config.base_url),
            UreqTransport::new(config.timeout),
        )
    }
}

impl<T: Transport> PersonApi<T> {
    /// Creates an API with the logging interceptor installed.
    pub fn new(client: PersonClient, transport: T) -> Self {
        Self {
            client,
            transport,
            interceptors: vec![Box::new(LoggingInterceptor)],
        }
    }

    /// Creates an API with no interceptors at all.
    pub fn bare(client: PersonClient, transport: T) -> Self {
        Self {
            client,
            transport,
            interceptors: Vec::new(),
        }
    }

    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    pub fn client(&self) -> &PersonClient {
        &self.client
    }

    pub fn get_list(&self, params: &SearchParams) -> Result<ListResponse, FetchError> {
        self.run(Operation::List, || Ok(self.client.build_get_list(params)), |resp| {
            self.client.parse_get_list(resp)
        })
    }

    pub fn get_detail(&self, id: &str) -> Result<DetailResponse, FetchError> {
        self.run(Operation::Detail, || self.client.build_get_detail(id), |resp| {
            self.client.parse_get_detail(resp)
        })
    }

    pub fn create(&self, input: &NewPerson) -> Result<DetailResponse, FetchError> {
        self.run(Operation::Create, || self.client.build_create(input), |resp| {
            self.client.parse_create(resp)
        })
    }

    pub fn update(&self, id: &str, patch: &PersonPatch) -> Result<DetailResponse, FetchError> {
        self.run(Operation::Update, || self.client.build_update(id, patch), |resp| {
            self.client.parse_update(resp)
        })
    }

    pub fn remove(&self, id: &str) -> Result<OperationResult, FetchError> {
        self.run(Operation::Delete, || self.client.build_remove(id), |resp| {
            self.client.parse_remove(resp)
        })
    }

    pub fn batch_remove(&self, ids: &[String]) -> Result<OperationResult, FetchError> {
        self.run(Operation::BatchDelete, || self.client.build_batch_remove(ids), |resp| {
            self.client.parse_batch_remove(resp)
        })
    }

    fn run<R>(
        &self,
        operation: Operation,
        build: impl FnOnce() -> Result<HttpRequest, ApiError>,
        parse: impl FnOnce(HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, FetchError> {
        let result = build()
            .and_then(|req| self.execute(req))
            .and_then(parse);
        result.map_err(|source| FetchError::new(operation, source))
    }

    /// Runs `request` through the interceptors and the transport. Non-2xx
    /// responses are classified here so `on_error` sees every failure.
    fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        for interceptor in &self.interceptors {
            interceptor.on_request(&mut request);
        }

        let outcome = self.transport.execute(&request).and_then(|response| {
            for interceptor in &self.interceptors {
                interceptor.on_response(&request, &response);
            }
            check_status(&response).map(|()| response)
        });

        if let Err(err) = &outcome {
            for interceptor in &self.interceptors {
                interceptor.on_error(&request, err);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::http::HttpMethod;
    use crate::interceptor::BearerAuth;
    use crate::types::PersonStatus;

    const PERSON_JSON: &str = r#"{"id":"p1","name":"Ada","email":"ada@example.com",
        "phone":"555-0100","department":"Engineering","position":"Engineer",
        "joinDate":"2021-03-01","status":"active","location":"London"}"#;

    /// Replies with a canned status/body and records every request it saw.
    struct FakeTransport {
        status: u16,
        body: String,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for FakeTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Interceptor for Recorder {
        fn on_request(&self, request: &mut HttpRequest) {
            self.events
                .lock()
                .unwrap()
                .push(format!("request {}", request.method));
        }

        fn on_response(&self, _request: &HttpRequest, response: &HttpResponse) {
            self.events
                .lock()
                .unwrap()
                .push(format!("response {}", response.status));
        }

        fn on_error(&self, _request: &HttpRequest, error: &ApiError) {
            self.events
                .lock()
                .unwrap()
                .push(format!("error {:?}", error.status()));
        }
    }

    fn api(transport: FakeTransport) -> PersonApi<FakeTransport> {
        PersonApi::new(PersonClient::new("http://api.test"), transport)
    }

    #[test]
    fn get_list_sends_defaults_and_decodes() {
        let body = format!(r#"{{"data":[{PERSON_JSON}],"total":1,"page":1,"pageSize":10}}"#);
        let api = api(FakeTransport::new(200, &body));
        let list = api.get_list(&SearchParams::default()).unwrap();
        assert_eq!(list.total, 1);

        let seen = api.transport.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, "http://api.test/persons");
        assert_eq!(seen[0].query_value("pageSize"), Some("10"));
        assert_eq!(seen[0].query_value("status"), Some(""));
    }

    #[test]
    fn every_call_hits_the_transport() {
        let body = r#"{"data":[],"total":0,"page":1,"pageSize":10}"#;
        let api = api(FakeTransport::new(200, body));
        api.get_list(&SearchParams::default()).unwrap();
        api.get_list(&SearchParams::default()).unwrap();
        assert_eq!(api.transport.seen.borrow().len(), 2);
    }

    #[test]
    fn failures_become_fetch_errors_with_operation_message() {
        let api = api(FakeTransport::new(404, ""));
        let err = api.get_detail("nonexistent-id").unwrap_err();
        assert_eq!(err.operation, Operation::Detail);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "failed to fetch person detail, try again later");
    }

    #[test]
    fn empty_id_is_rejected_without_io() {
        let api = api(FakeTransport::new(200, ""));
        let err = api.remove("").unwrap_err();
        assert!(matches!(err.source, ApiError::InvalidInput(_)));
        assert!(api.transport.seen.borrow().is_empty());
    }

    #[test]
    fn transport_errors_are_wrapped() {
        let transport = |_: &HttpRequest| -> Result<HttpResponse, ApiError> { Err(ApiError::Timeout) };
        let api = PersonApi::new(PersonClient::new("http://api.test"), transport);
        let err = api.batch_remove(&["a".to_string()]).unwrap_err();
        assert_eq!(err.operation, Operation::BatchDelete);
        assert!(matches!(err.source, ApiError::Timeout));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let api = api(FakeTransport::new(200, r#"{"person":{}}"#));
        let err = api.create(&new_person()).unwrap_err();
        assert!(matches!(err.source, ApiError::DeserializationError(_)));
    }

    #[test]
    fn transport_failure_reaches_on_error_once() {
        let recorder = Recorder::default();
        let transport = |_: &HttpRequest| -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        };
        let api = PersonApi::bare(PersonClient::new("http://api.test"), transport)
            .with_interceptor(recorder.clone());

        let err = api.get_list(&SearchParams::default()).unwrap_err();
        assert_eq!(err.operation, Operation::List);
        assert_eq!(*recorder.events.lock().unwrap(), vec!["request GET", "error None"]);
    }

    #[test]
    fn interceptors_see_requests_responses_and_errors() {
        let recorder = Recorder::default();
        let api = PersonApi::bare(
            PersonClient::new("http://api.test"),
            FakeTransport::new(401, "expired"),
        )
        .with_interceptor(recorder.clone());

        let err = api.update("p1", &PersonPatch::default()).unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["request PUT", "response 401", "error Some(401)"]
        );
    }

    #[test]
    fn bearer_auth_reaches_the_transport() {
        let api = api(FakeTransport::new(200, r#"{"success":true,"message":"ok"}"#))
            .with_interceptor(BearerAuth::new("secret"));
        let result = api.remove("p1").unwrap();
        assert!(result.success);

        let seen = api.transport.seen.borrow();
        assert_eq!(seen[0].method, HttpMethod::Delete);
        assert_eq!(seen[0].header("authorization"), Some("Bearer secret"));
        assert_eq!(seen[0].header("content-type"), Some("application/json"));
    }

    #[test]
    fn batch_remove_with_no_ids_succeeds() {
        let api = api(FakeTransport::new(
            200,
            r#"{"success":true,"message":"deleted 0 of 0 persons"}"#,
        ));
        let result = api.batch_remove(&[]).unwrap();
        assert!(result.success);
        assert_eq!(
            api.transport.seen.borrow()[0].body.as_deref(),
            Some(r#"{"ids":[]}"#)
        );
    }

    fn new_person() -> NewPerson {
        NewPerson {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            avatar: None,
            department: "Engineering".to_string(),
            position: "Engineer".to_string(),
            join_date: "2021-03-01".to_string(),
            status: PersonStatus::Active,
            bio: None,
            skills: None,
            location: "London".to_string(),
        }
    }
}
