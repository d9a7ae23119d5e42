//! Error types for the store and the HTTP boundary
//!
//! Errors are classified by where they are caught:
//! - Validation: malformed payloads, rejected before the store is touched
//! - Store: writes naming an unknown client, joins that lose their client
//! - Api: the HTTP-facing mapping of both, plus id parsing and not-found

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Failures raised by the store and the services layered over it.
///
/// Unknown ids on plain reads and updates are not errors; those return `None`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A write referenced a client id that does not exist.
    #[error("Client {0} does not exist")]
    ClientNotFound(i64),

    /// A stored meeting points at a client that is no longer in the store.
    #[error("Meeting {meeting_id} references missing client {client_id}")]
    MissingClient { meeting_id: i64, client_id: i64 },

    #[error("Meeting type `{0}` already exists")]
    DuplicateMeetingType(String),
}

/// Payload shape problems found at the boundary.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0}")]
    Malformed(String),

    #[error("Required at \"{0}\"")]
    Required(&'static str),

    #[error("endTime must be after startTime")]
    EndNotAfterStart,
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::Malformed(err.to_string())
    }
}

/// Entity kinds named in HTTP error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Client,
    Meeting,
    Integration,
}

impl Entity {
    fn label(&self) -> &'static str {
        match self {
            Entity::Client => "client",
            Entity::Meeting => "meeting",
            Entity::Integration => "integration",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Entity::Client => "Client",
            Entity::Meeting => "Meeting",
            Entity::Integration => "Integration",
        }
    }
}

/// HTTP-facing error. Every variant renders as a small JSON object with an `error` field.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid {} ID", .0.label())]
    InvalidId(Entity),

    #[error("{} not found", .0.title())]
    NotFound(Entity),

    #[error("Client not found: {0}")]
    UnknownClient(i64),

    /// `action` completes "Failed to ..." in the response; `source` is only logged.
    #[error("Failed to {action}")]
    Internal {
        action: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn internal(action: &'static str, source: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal {
            action,
            source: source.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId(_) | ApiError::UnknownClient(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a store failure hit while serving `action`.
    pub fn from_store(action: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::ClientNotFound(id) => ApiError::UnknownClient(id),
            other => ApiError::internal(action, other),
        }
    }
}

/// Serializable error body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Validation(inner) => ErrorBody {
                error: "Validation error".to_string(),
                details: Some(inner.to_string()),
            },
            ApiError::UnknownClient(id) => ErrorBody {
                error: "Client not found".to_string(),
                details: Some(format!("No client with id {id}")),
            },
            other => ErrorBody {
                error: other.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { action, source } = &self {
            tracing::error!(error = ?source, "failed to {action}");
        }
        (self.status_code(), Json(ErrorBody::from(&self))).into_response()
    }
}
