use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::json_response;

/// Successful outcome of a `/kv` command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A new entry was inserted
    Created { key: String, value: String },
    /// The current (or just written) value of an entry
    Entry { key: String, value: String },
    /// An entry was removed
    Deleted { key: String },
}

impl Reply {
    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Created { .. } => StatusCode::CREATED,
            Reply::Entry { .. } | Reply::Deleted { .. } => StatusCode::OK,
        }
    }

    /// JSON object sent back to the client
    ///
    /// Entries are echoed as `{"<key>": "<value>"}`, deletions as
    /// `{"message": "Deleted <key>"}`.
    pub fn body(&self) -> BTreeMap<String, String> {
        let mut body = BTreeMap::new();
        match self {
            Reply::Created { key, value } | Reply::Entry { key, value } => {
                body.insert(key.clone(), value.clone());
            }
            Reply::Deleted { key } => {
                body.insert("message".to_string(), format!("Deleted {}", key));
            }
        }
        body
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        json_response(self.status(), &self.body())
    }
}
