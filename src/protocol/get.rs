use crate::error::{KvError, Result};
use crate::protocol::command::Command;
use crate::protocol::reply::Reply;
use crate::protocol::{KeyBody, decode_body, require_non_empty};
use crate::store::Store;

/// GET command: GET /kv?key=<key>
#[derive(Debug, Clone, PartialEq)]
pub struct GetCmd {
    pub key: String,
}

impl GetCmd {
    /// Create a new GET command
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Parse a GET command
    ///
    /// The `key` query parameter wins; a JSON body `{"key": ...}` is only
    /// consulted when the query carries no key.
    pub fn parse(query_key: Option<String>, body: &[u8]) -> Result<Command> {
        let key = match query_key {
            Some(key) => key,
            None if body.iter().all(u8::is_ascii_whitespace) => {
                return Err(KvError::MalformedRequest(
                    "missing key query parameter".to_string(),
                ));
            }
            None => decode_body::<KeyBody>(body)?.key,
        };
        require_non_empty("key", &key)?;

        Ok(Command::Get(GetCmd::new(key)))
    }

    /// Execute the GET command
    pub async fn execute(&self, store: &Store) -> Result<Reply> {
        let value = store.get(&self.key).await?;
        Ok(Reply::Entry {
            key: self.key.clone(),
            value,
        })
    }
}
