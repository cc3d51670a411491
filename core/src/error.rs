//! Error taxonomy and the status-code mapper.
//!
//! # Design
//! `NotFound`, `Validation` and `Unauthorized` get dedicated variants because
//! callers act on them differently; 422 and 403 bodies are kept verbatim so
//! field-level codes stay inspectable. Every other non-2xx lands in
//! `UnexpectedResponse` with the raw status and body.
//!
//! Mapping happens at the call site that issued the request. Nothing here
//! retries.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::http::{HttpMethod, HttpResponse};

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the HAL layer and the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The resource has no link with this relation name.
    #[error("no such relation available on this resource: {relation}")]
    RelationNotFound { relation: String },

    /// A templated link needs a value that was not supplied.
    #[error("missing value for template parameter `{name}`")]
    MissingTemplateParameter { name: String },

    /// The response body does not have the shape of the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// 404 from the provider.
    #[error("resource not found")]
    NotFound,

    /// 422 from the provider.
    #[error("{method} rejected: {}", .message.message)]
    Validation {
        method: HttpMethod,
        message: ValidationMessage,
    },

    /// 403 from the provider.
    #[error("not permitted: {}", .0.message)]
    Unauthorized(ForbiddenMessage),

    /// `next_page` was called on the last page.
    #[error("there are no more results")]
    NoMoreResults,

    /// Any other non-2xx status.
    #[error("unexpected HTTP {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("invalid URI: {0}")]
    InvalidUri(String),

    #[error("could not obtain access token: {0}")]
    Token(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

/// Body of a 422 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ValidationData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationData {
    pub field: String,
    pub code: String,
}

/// Body of a 403 response. A plain `{ "message": ... }` body has no errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenMessage {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ForbiddenData>,
}

impl ForbiddenMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenData {
    pub code: String,
}

/// Map a non-success response to the matching `ApiError` variant.
///
/// `method` is carried into `Validation` so callers can tell a rejected
/// create from a rejected update.
pub fn check_status(method: HttpMethod, response: &HttpResponse) -> ApiResult<()> {
    if response.is_success() {
        return Ok(());
    }

    warn!(status = response.status, %method, "provider returned an error status");

    match response.status {
        404 => Err(ApiError::NotFound),
        422 => match serde_json::from_str::<ValidationMessage>(&response.body) {
            Ok(message) => Err(ApiError::Validation { method, message }),
            Err(_) => Err(unexpected(response)),
        },
        403 => Err(ApiError::Unauthorized(forbidden_message(&response.body))),
        _ => Err(unexpected(response)),
    }
}

fn forbidden_message(body: &str) -> ForbiddenMessage {
    serde_json::from_str(body).unwrap_or_else(|_| ForbiddenMessage::new(body.trim()))
}

fn unexpected(response: &HttpResponse) -> ApiError {
    ApiError::UnexpectedResponse {
        status: response.status,
        body: response.body.clone(),
    }
}
