//! Stateless HTTP request builder and response parser for the pets API.
//!
//! # Design
//! `PetClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Draft, Pet, PetId, ValidationErrors};

/// Synchronous, stateless client for the pets API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct PetClient {
    base_url: String,
}

impl PetClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_pets(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/pets", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_pet(&self, id: PetId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/pets/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_pet(&self, draft: &Draft) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(draft).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/pets", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    /// `PUT` sends the full record, id included.
    pub fn build_update_pet(&self, pet: &Pet) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(pet).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/pets/{}", self.base_url, pet.id),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete_pet(&self, id: PetId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/pets/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_pets(&self, response: HttpResponse) -> Result<Vec<Pet>, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_get_pet(&self, response: HttpResponse) -> Result<Pet, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_create_pet(&self, response: HttpResponse) -> Result<Pet, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_update_pet(&self, response: HttpResponse) -> Result<Pet, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    /// The body of a successful delete may be empty or echo the record; it
    /// is ignored either way.
    pub fn parse_delete_pet(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)?;
        Ok(())
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
///
/// A non-2xx body that parses as a non-empty validation error set is a
/// validation rejection regardless of the exact 4xx code the server picked.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    if let Ok(errors) = serde_json::from_str::<ValidationErrors>(&response.body) {
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
