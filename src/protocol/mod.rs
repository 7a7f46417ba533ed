//! `/kv` request protocol
//!
//! This module turns a decoded HTTP request (method, query key, raw body)
//! into one of the four store commands, validates it, runs it against the
//! [`Store`](crate::store::Store) and encodes the outcome as a [`Reply`].

pub mod command;
pub mod delete;
pub mod get;
pub mod insert;
pub mod reply;
pub mod update;

pub use command::Command;
pub use reply::Reply;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{KvError, Result};

/// Body of POST and PUT requests
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyValueBody {
    pub key: String,
    pub value: String,
}

/// Body of DELETE requests, and of GET requests without a query key
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyBody {
    pub key: String,
}

/// Query string accepted on `/kv`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KvQuery {
    pub key: Option<String>,
}

/// Decode a JSON request body
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(KvError::MalformedRequest("empty request body".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| KvError::MalformedRequest(e.to_string()))
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(KvError::InvalidArgument(format!("{} must not be empty", field)));
    }
    Ok(())
}
