use crate::error::Result;
use crate::protocol::command::Command;
use crate::protocol::reply::Reply;
use crate::protocol::{KeyValueBody, decode_body, require_non_empty};
use crate::store::Store;

/// PUT command: replace the value of an existing key
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCmd {
    pub key: String,
    pub value: String,
}

impl UpdateCmd {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn parse(body: &[u8]) -> Result<Command> {
        let KeyValueBody { key, value } = decode_body(body)?;
        require_non_empty("key", &key)?;
        require_non_empty("value", &value)?;

        Ok(Command::Update(UpdateCmd::new(key, value)))
    }

    pub async fn execute(&self, store: &Store) -> Result<Reply> {
        store.update(&self.key, self.value.clone()).await?;
        Ok(Reply::Entry {
            key: self.key.clone(),
            value: self.value.clone(),
        })
    }
}
