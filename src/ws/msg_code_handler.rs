use tracing::{debug, error, warn};

use crate::models::{CodeChangeMessage, CodeMessage, ServerMessage};
use crate::state::AppState;
use crate::ws::connctx::ConnCtx;

/// Handle CodeChangeMessage
pub async fn handle_code_message(change: &CodeChangeMessage, ctx: &ConnCtx, state: &AppState) {
    let room_id = &change.room_id;

    // Edits are only accepted for rooms this connection has joined.
    if !ctx.is_member(room_id) {
        warn!(
            "Dropping code-change from {} for room '{}' it never joined",
            ctx.socket_id, room_id
        );
        return;
    }

    debug!(
        "Code change in room {} from {} ({} bytes)",
        room_id,
        ctx.socket_id,
        change.code.len()
    );

    // Relay to peers first; the sender gets no echo.
    state
        .hub
        .broadcast(
            room_id,
            &ServerMessage::CodeChange(CodeMessage {
                code: change.code.clone(),
            }),
            Some(ctx.socket_id),
        )
        .await;

    // Persist last-write-wins. Failure is logged and swallowed: peers
    // already saw the edit live.
    if let Some(store) = &state.store {
        if let Err(e) = store.upsert_code(room_id, &change.code).await {
            error!("Error saving code for room '{}' to database: {}", room_id, e);
        }
    }
}
