//! In-memory key-value store served over HTTP
//!
//! - **`store`**: the key-value map behind a single reader-writer lock with
//!   bounded acquisition.
//! - **`protocol`**: decoding, validation and execution of the four `/kv`
//!   commands (GET, POST, PUT, DELETE) and their replies.
//! - **`server`**: TCP listener and the axum router for `/kv`.
//! - **`config`**: TOML configuration with defaults.
//! - **`error`**: the request error taxonomy and its JSON error envelope.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::KvError;
pub use server::Server;
pub use store::Store;
