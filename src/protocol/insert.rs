use crate::error::Result;
use crate::protocol::command::Command;
use crate::protocol::reply::Reply;
use crate::protocol::{KeyValueBody, decode_body, require_non_empty};
use crate::store::Store;

/// POST command: create a key that does not exist yet
#[derive(Debug, Clone, PartialEq)]
pub struct InsertCmd {
    pub key: String,
    pub value: String,
}

impl InsertCmd {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse an insert from a `{"key", "value"}` body
    pub fn parse(body: &[u8]) -> Result<Command> {
        let KeyValueBody { key, value } = decode_body(body)?;
        require_non_empty("key", &key)?;
        require_non_empty("value", &value)?;

        Ok(Command::Insert(InsertCmd::new(key, value)))
    }

    pub async fn execute(&self, store: &Store) -> Result<Reply> {
        store.insert(self.key.clone(), self.value.clone()).await?;
        Ok(Reply::Created {
            key: self.key.clone(),
            value: self.value.clone(),
        })
    }
}
