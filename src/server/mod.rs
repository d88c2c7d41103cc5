//! REST API server over the SQLite store.
//!
//! A single connection sits behind an async mutex; each request takes the
//! lock for one store call. CORS is fully open.

mod error;
mod handlers;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, put};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::api::{BUDGET_PATH, ITEMS_PATH};
use crate::error::Result;
use crate::storage::SqliteStorage;

pub use error::ApiError;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3001;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    storage: Arc<Mutex<SqliteStorage>>,
}

impl AppState {
    #[must_use]
    pub fn new(storage: SqliteStorage) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
        }
    }
}

/// Build the API router.
pub fn router(storage: SqliteStorage) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(BUDGET_PATH, get(handlers::get_budget).put(handlers::put_budget))
        .route(
            ITEMS_PATH,
            get(handlers::list_items)
                .post(handlers::create_item)
                .put(handlers::replace_items),
        )
        .route(
            "/api/items/{id}",
            put(handlers::update_item).delete(handlers::delete_item),
        )
        .layer(cors)
        .with_state(AppState::new(storage))
}

/// Serve the API on `listener` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve(listener: TcpListener, storage: SqliteStorage) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "backend server listening");

    axum::serve(listener, router(storage))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
