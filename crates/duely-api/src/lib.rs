//! HTTP API exposing CRUD over tasks, categories and priorities.

mod error;
mod handlers;


use axum::routing::get;
use axum::{Json, Router};
use std::future::Future;
use tokio::net::TcpListener;

use duely_storage::Store;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

/// Build the application router.
pub fn router(store: Store) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/tasks",
            get(handlers::tasks::list).post(handlers::tasks::create),
        )
        .route(
            "/tasks/{id}",
            get(handlers::tasks::get)
                .put(handlers::tasks::update)
                .delete(handlers::tasks::delete),
        )
        .route(
            "/categories",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route(
            "/categories/{id}",
            get(handlers::categories::get)
                .put(handlers::categories::update)
                .delete(handlers::categories::delete),
        )
        .route(
            "/priorities",
            get(handlers::priorities::list).post(handlers::priorities::create),
        )
        .route(
            "/priorities/{id}",
            get(handlers::priorities::get)
                .put(handlers::priorities::update)
                .delete(handlers::priorities::delete),
        )
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(AppState { store })
}

/// Serve the API on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections
pub async fn serve(
    listener: TcpListener,
    store: Store,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    log::info!("API listening on http://{local_addr}");

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await?;

    log::info!("API server stopped");
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok"
    }))
}
