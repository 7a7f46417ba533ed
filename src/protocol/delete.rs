use crate::error::Result;
use crate::protocol::command::Command;
use crate::protocol::reply::Reply;
use crate::protocol::{KeyBody, decode_body, require_non_empty};
use crate::store::Store;

/// DELETE command: DELETE /kv {"key": ...}
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCmd {
    pub key: String,
}

impl DeleteCmd {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn parse(body: &[u8]) -> Result<Command> {
        let KeyBody { key } = decode_body(body)?;
        require_non_empty("key", &key)?;

        Ok(Command::Delete(DeleteCmd::new(key)))
    }

    pub async fn execute(&self, store: &Store) -> Result<Reply> {
        store.delete(&self.key).await?;
        Ok(Reply::Deleted {
            key: self.key.clone(),
        })
    }
}
