use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::state::AppState;

/// Download the latest text of a room as a file attachment
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Response {
    let store = match &state.store {
        Some(store) => store,
        None => {
            error!(
                "Download requested for room '{}' but no database is configured",
                room_id
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    match store.get_room(&room_id).await {
        Ok(Some(room)) => (
            StatusCode::OK,
            [
                (header::CONTENT_DISPOSITION, "attachment; filename=text.txt"),
                (header::CONTENT_TYPE, "text/plain"),
            ],
            room.code,
        )
            .into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Room not found").into_response(),
        Err(e) => {
            error!(
                "Error fetching code for room '{}' from database: {}",
                room_id, e
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
