use crate::handlers::{download, health_check, ready_check};
use crate::state::AppState;
use crate::ws::handler::websocket_handler;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/download/:room_id", get(download))
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/ws", get(websocket_handler))
        .with_state(state)
}
