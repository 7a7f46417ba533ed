use axum::http::Method;
use tracing::debug;

use crate::error::{KvError, Result};
use crate::protocol::delete::DeleteCmd;
use crate::protocol::get::GetCmd;
use crate::protocol::insert::InsertCmd;
use crate::protocol::reply::Reply;
use crate::protocol::update::UpdateCmd;
use crate::store::Store;

/// `/kv` command types
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// GET /kv?key=
    Get(GetCmd),
    /// POST /kv {key, value}
    Insert(InsertCmd),
    /// PUT /kv {key, value}
    Update(UpdateCmd),
    /// DELETE /kv {key}
    Delete(DeleteCmd),
}

impl Command {
    /// Parse and validate a request into a Command
    pub fn parse(method: &Method, query_key: Option<String>, body: &[u8]) -> Result<Self> {
        match *method {
            Method::GET => GetCmd::parse(query_key, body),
            Method::POST => InsertCmd::parse(body),
            Method::PUT => UpdateCmd::parse(body),
            Method::DELETE => DeleteCmd::parse(body),
            _ => Err(KvError::MethodNotAllowed(method.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Get(_) => "get",
            Command::Insert(_) => "insert",
            Command::Update(_) => "update",
            Command::Delete(_) => "delete",
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Command::Get(cmd) => &cmd.key,
            Command::Insert(cmd) => &cmd.key,
            Command::Update(cmd) => &cmd.key,
            Command::Delete(cmd) => &cmd.key,
        }
    }

    /// Execute the command on the given store
    pub async fn execute(&self, store: &Store) -> Result<Reply> {
        debug!("Received {} command for key {:?}", self.name(), self.key());
        match self {
            Command::Get(cmd) => cmd.execute(store).await,
            Command::Insert(cmd) => cmd.execute(store).await,
            Command::Update(cmd) => cmd.execute(store).await,
            Command::Delete(cmd) => cmd.execute(store).await,
        }
    }

    /// Parse and execute a request on the given store
    pub async fn handle(
        method: &Method,
        query_key: Option<String>,
        body: &[u8],
        store: &Store,
    ) -> Result<Reply> {
        Self::parse(method, query_key, body)?.execute(store).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get_command() {
        let cmd = Command::parse(&Method::GET, Some("mykey".to_string()), b"").unwrap();
        assert_eq!(cmd, Command::Get(GetCmd::new("mykey")));
        assert_eq!(cmd.name(), "get");
    }

    #[test]
    fn test_parse_post_command() {
        let cmd = Command::parse(&Method::POST, None, br#"{"key":"mykey","value":"myvalue"}"#)
            .unwrap();
        match cmd {
            Command::Insert(insert) => {
                assert_eq!(insert.key, "mykey");
                assert_eq!(insert.value, "myvalue");
            }
            _ => panic!("Expected insert command"),
        }
    }

    #[test]
    fn test_parse_put_and_delete() {
        let put = Command::parse(&Method::PUT, None, br#"{"key":"k","value":"v"}"#).unwrap();
        assert_eq!(put, Command::Update(UpdateCmd::new("k", "v")));

        let delete = Command::parse(&Method::DELETE, None, br#"{"key":"k"}"#).unwrap();
        assert_eq!(delete, Command::Delete(DeleteCmd::new("k")));
        assert_eq!(delete.key(), "k");
    }

    #[test]
    fn test_parse_unsupported_method() {
        let result = Command::parse(&Method::PATCH, None, br#"{"key":"k"}"#);
        assert_eq!(result, Err(KvError::MethodNotAllowed("PATCH".to_string())));
    }

    #[test]
    fn test_method_checked_before_body() {
        let result = Command::parse(&Method::OPTIONS, None, b"not json");
        assert_eq!(result, Err(KvError::MethodNotAllowed("OPTIONS".to_string())));
    }

    #[tokio::test]
    async fn test_handle_scenario() {
        let store = Store::new();

        let created = Command::handle(
            &Method::POST,
            None,
            br#"{"key":"Hello","value":"World"}"#,
            &store,
        )
        .await
        .unwrap();
        assert_eq!(
            created,
            Reply::Created {
                key: "Hello".to_string(),
                value: "World".to_string()
            }
        );

        let read = Command::handle(&Method::GET, Some("Hello".to_string()), b"", &store)
            .await
            .unwrap();
        assert_eq!(
            read,
            Reply::Entry {
                key: "Hello".to_string(),
                value: "World".to_string()
            }
        );

        let updated = Command::handle(
            &Method::PUT,
            None,
            br#"{"key":"Hello","value":"Censys"}"#,
            &store,
        )
        .await
        .unwrap();
        assert_eq!(
            updated,
            Reply::Entry {
                key: "Hello".to_string(),
                value: "Censys".to_string()
            }
        );

        let deleted = Command::handle(&Method::DELETE, None, br#"{"key":"Hello"}"#, &store)
            .await
            .unwrap();
        assert_eq!(
            deleted,
            Reply::Deleted {
                key: "Hello".to_string()
            }
        );

        let gone = Command::handle(&Method::GET, Some("Hello".to_string()), b"", &store).await;
        assert_eq!(gone, Err(KvError::NotFound("Hello".to_string())));
    }

    #[tokio::test]
    async fn test_handle_parse_error_leaves_store_untouched() {
        let store = Store::new();
        let result = Command::handle(&Method::POST, None, br#"{"key":"k""#, &store).await;
        assert!(matches!(result, Err(KvError::MalformedRequest(_))));
        assert!(store.is_empty().await.unwrap());
    }
}
