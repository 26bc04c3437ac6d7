use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::ui::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    state::AppState,
};

/// Routes:
///
/// * `GET /ws` - game connection
/// * `GET /api/health`
/// * `GET /api/rooms`
/// * `GET /api/rooms/{name}`
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{name}", get(get_room_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
