use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use bytes::Bytes;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{KvError, json_response};
use crate::protocol::{Command, KvQuery, Reply};
use crate::store::Store;

/// Resource path served by the store
pub const KV_PATH: &str = "/kv";

/// HTTP server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    store: Arc<Store>,
}

impl Server {
    /// Create and bind the server to the configured address
    pub async fn bind(config: &Config) -> std::io::Result<Self> {
        let listener = TcpListener::bind(&config.server_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);

        let store = Arc::new(Store::with_lock_timeout(config.lock_timeout()));

        Ok(Self {
            listener,
            local_addr,
            store,
        })
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Build the router for `/kv`
    pub fn router(store: Arc<Store>) -> Router {
        Router::new()
            .route(KV_PATH, any(handle_kv))
            .fallback(handle_no_route)
            .with_state(store)
    }

    /// Serve requests until Ctrl-C
    pub async fn run(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve requests until `shutdown` resolves, then drain in-flight requests
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Server started, listening on {}", self.local_addr);

        let app = Self::router(self.store);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Handle a single `/kv` request
///
/// Exactly one store operation is applied per request and exactly one
/// response is produced, either the command's reply or a [`KvError`].
#[tracing::instrument(skip_all, fields(method = %method, path = KV_PATH))]
async fn handle_kv(
    State(store): State<Arc<Store>>,
    method: Method,
    query: Result<Query<KvQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match dispatch(&store, &method, query, body).await {
        Ok(reply) => {
            info!("{} {} -> {}", method, KV_PATH, reply.status());
            reply.into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn dispatch(
    store: &Store,
    method: &Method,
    query: Result<Query<KvQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Reply, KvError> {
    // Only GET reads the query string
    let query_key = match query {
        Ok(Query(query)) => query.key,
        Err(rejection) if *method == Method::GET => {
            return Err(KvError::MalformedRequest(rejection.body_text()));
        }
        Err(_) => None,
    };
    let body = body.map_err(|rejection| KvError::MalformedRequest(rejection.body_text()))?;

    Command::handle(method, query_key, &body, store).await
}

async fn handle_no_route(method: Method, uri: Uri) -> Response {
    info!("{} {} -> no route", method, uri.path());
    json_response(
        StatusCode::NOT_FOUND,
        &json!({ "error": format!("no route for {}", uri.path()) }),
    )
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
