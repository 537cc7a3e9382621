//! Stateless HTTP request builder and response parser for the person API.
//!
//! # Design
//! `PersonClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Success bodies are decoded through an explicit `{ "data": .. }` envelope so
//! a backend that drops the field fails fast with a deserialization error.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, CONTENT_TYPE};
use crate::types::{
    BatchDeleteRequest, DetailResponse, ListResponse, NewPerson, OperationResult, Person,
    PersonPatch, SearchParams,
};

/// Characters escaped when an identifier is placed in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'.')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Synchronous, stateless client for the person API.
#[derive(Debug, Clone)]
pub struct PersonClient {
    base_url: String,
}

impl PersonClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_list(&self, params: &SearchParams) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/persons", self.base_url),
            query: params.to_query(),
            headers: json_headers(),
            body: None,
        }
    }

    pub fn build_get_detail(&self, id: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/getPerson/{}", self.base_url, encode_id(id)?),
            query: Vec::new(),
            headers: json_headers(),
            body: None,
        })
    }

    pub fn build_create(&self, input: &NewPerson) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/createPerson", self.base_url),
            query: Vec::new(),
            headers: json_headers(),
            body: Some(to_json(input)?),
        })
    }

    pub fn build_update(&self, id: &str, patch: &PersonPatch) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/updatePerson/{}", self.base_url, encode_id(id)?),
            query: Vec::new(),
            headers: json_headers(),
            body: Some(to_json(patch)?),
        })
    }

    pub fn build_remove(&self, id: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/deletePerson/{}", self.base_url, encode_id(id)?),
            query: Vec::new(),
            headers: json_headers(),
            body: None,
        })
    }

    pub fn build_batch_remove(&self, ids: &[String]) -> Result<HttpRequest, ApiError> {
        let payload = BatchDeleteRequest { ids: ids.to_vec() };
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/batchDeletePersons", self.base_url),
            query: Vec::new(),
            headers: json_headers(),
            body: Some(to_json(&payload)?),
        })
    }

    pub fn parse_get_list(&self, response: HttpResponse) -> Result<ListResponse, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_get_detail(&self, response: HttpResponse) -> Result<DetailResponse, ApiError> {
        self.parse_person(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<DetailResponse, ApiError> {
        self.parse_person(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<DetailResponse, ApiError> {
        self.parse_person(response)
    }

    pub fn parse_remove(&self, response: HttpResponse) -> Result<OperationResult, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_batch_remove(&self, response: HttpResponse) -> Result<OperationResult, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    fn parse_person(&self, response: HttpResponse) -> Result<DetailResponse, ApiError> {
        check_status(&response)?;
        let envelope: Envelope<Person> = from_json(&response.body)?;
        Ok(DetailResponse {
            data: envelope.data,
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let body = response.body.clone();
    Err(match response.status {
        401 => ApiError::Unauthorized { body },
        404 => ApiError::NotFound,
        500 => ApiError::ServerError { body },
        status => ApiError::HttpError { status, body },
    })
}

fn json_headers() -> Vec<(String, String)> {
    vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())]
}

fn encode_id(id: &str) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidInput("person id must not be empty".to_string()));
    }
    Ok(utf8_percent_encode(id, PATH_SEGMENT).to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
