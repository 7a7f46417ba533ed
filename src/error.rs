//! Request errors
//!
//! Every failure a `/kv` request can run into is a [`KvError`]. Each variant
//! maps to one HTTP status and renders as `{"error": "<message>"}`.

use std::time::Duration;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, KvError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KvError {
    /// Body unparsable, not an object, or missing a required field
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// A supplied field is present but empty
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Insert on a key that is already present
    #[error("key {0} already exists; use PUT to update it")]
    Conflict(String),

    /// Lookup, update or delete on an absent key
    #[error("key {0} not found")]
    NotFound(String),

    #[error("method {0} not allowed on /kv")]
    MethodNotAllowed(String),

    /// The store lock could not be acquired in time
    #[error("store busy: lock not acquired within {}ms", .0.as_millis())]
    LockTimeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

impl KvError {
    pub fn status(&self) -> StatusCode {
        match self {
            KvError::MalformedRequest(_) | KvError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            KvError::Conflict(_) => StatusCode::CONFLICT,
            KvError::NotFound(_) => StatusCode::NOT_FOUND,
            KvError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            KvError::LockTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            KvError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-friendly name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            KvError::MalformedRequest(_) => "malformed_request",
            KvError::InvalidArgument(_) => "invalid_argument",
            KvError::Conflict(_) => "conflict",
            KvError::NotFound(_) => "not_found",
            KvError::MethodNotAllowed(_) => "method_not_allowed",
            KvError::LockTimeout(_) => "lock_timeout",
            KvError::Internal(_) => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Fallback body used when even the error envelope fails to serialize
const INTERNAL_ERROR_BODY: &str = r#"{"error":"internal error"}"#;

impl IntoResponse for KvError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.kind(), "request failed: {}", self);
        } else {
            warn!(kind = self.kind(), "request rejected: {}", self);
        }

        let message = self.to_string();
        let mut response = json_response(status, &ErrorBody { error: &message });
        if let KvError::MethodNotAllowed(_) = self {
            response
                .headers_mut()
                .insert(header::ALLOW, header::HeaderValue::from_static("GET, POST, PUT, DELETE"));
        }
        response
    }
}

/// Serialize `body` as a JSON response with the given status.
///
/// A serialization failure never escapes: it is logged and turned into a
/// 500 carrying the standard error envelope.
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => {
            error!(kind = "internal", "failed to serialize response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                INTERNAL_ERROR_BODY,
            )
                .into_response()
        }
    }
}
