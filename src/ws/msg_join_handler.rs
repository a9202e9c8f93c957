use tracing::{error, info};

use crate::models::{ClientInfo, CodeMessage, JoinMessage, JoinedMessage, ServerMessage};
use crate::state::AppState;
use crate::ws::connctx::ConnCtx;

/// Handle JoinMessage
pub async fn handle_join_message(join_msg: &JoinMessage, ctx: &mut ConnCtx, state: &AppState) {
    let room_id = &join_msg.room_id;
    info!(
        "Join message received for room {}: username={}, socket={}",
        room_id, join_msg.username, ctx.socket_id
    );

    state
        .registry
        .set_name(ctx.socket_id, join_msg.username.clone())
        .await;
    state.hub.join(ctx.socket_id, room_id).await;
    ctx.joined(room_id);

    // Snapshot from the store, creating the room lazily on first join. A
    // storage failure downgrades to an empty snapshot so the live session
    // still starts; the error stays server-side.
    let code = match &state.store {
        Some(store) => match store.get_code(room_id).await {
            Ok(Some(code)) => code,
            Ok(None) => {
                if let Err(e) = store.create_room(room_id, "").await {
                    error!("Failed to create room '{}': {}", room_id, e);
                }
                String::new()
            }
            Err(e) => {
                error!("Error retrieving room '{}' from database: {}", room_id, e);
                String::new()
            }
        },
        None => String::new(),
    };

    // Send the existing code to the newly joined user only
    state
        .hub
        .send_to(ctx.socket_id, &ServerMessage::CodeChange(CodeMessage { code }))
        .await;

    // Presence list: every current member with its registered name
    let mut clients = Vec::new();
    for member in state.hub.members_of(room_id).await {
        let username = state
            .registry
            .name_of(member)
            .await
            .unwrap_or_else(|| "Anonymous".to_string());
        clients.push(ClientInfo {
            socket_id: member,
            username,
        });
    }

    // Notify every member, the joiner included, so all clients refresh
    // their peer list the same way.
    let joined = ServerMessage::Joined(JoinedMessage {
        clients,
        username: join_msg.username.clone(),
        socket_id: ctx.socket_id,
    });
    state.hub.broadcast(room_id, &joined, None).await;
}
