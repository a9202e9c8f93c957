use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{ClientMessage, DisconnectedMessage, ServerMessage};
use crate::state::AppState;
use crate::ws::connctx::ConnCtx;
use crate::ws::msg_code_handler::handle_code_message;
use crate::ws::msg_join_handler::handle_join_message;

/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Server-assigned identifier, valid for the lifetime of this session
    let socket_id = Uuid::new_v4();
    info!("WebSocket connection established with socket_id: {}", socket_id);

    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Outbound channel: the hub pushes frames here, the send task drains
    // them onto the socket.
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    state.hub.register(socket_id, tx).await;

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(frame).await.is_err() {
                break;
            }
        }
    });

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        let mut ctx = ConnCtx::new(socket_id);

        // Only text frames carry protocol messages; binary and ping/pong
        // frames are skipped, and the stream ends on close or transport
        // error.
        while let Some(Ok(frame)) = receiver.next().await {
            let Message::Text(msg) = frame else {
                continue;
            };

            // Parse the incoming message as JSON
            let client_msg: ClientMessage = match serde_json::from_str(&msg) {
                Ok(client_msg) => client_msg,
                Err(e) => {
                    error!("Failed to parse message from {}: {}", socket_id, e);
                    continue;
                }
            };

            match client_msg {
                ClientMessage::Join(join_msg) => {
                    handle_join_message(&join_msg, &mut ctx, &recv_state).await;
                }
                ClientMessage::CodeChange(change) => {
                    handle_code_message(&change, &ctx, &recv_state).await;
                }
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    disconnect(socket_id, &state).await;
    info!("WebSocket connection terminated for socket_id: {}", socket_id);
}

/// Disconnect teardown: one departure notification per formerly-joined
/// room, then registry and hub cleanup.
async fn disconnect(socket_id: Uuid, state: &AppState) {
    let username = state
        .registry
        .name_of(socket_id)
        .await
        .unwrap_or_else(|| "Anonymous".to_string());

    let rooms = state.hub.leave_all(socket_id).await;
    for room_id in rooms {
        // The departing member is already out of the set, so no exclusion
        // is needed.
        let departed = ServerMessage::Disconnected(DisconnectedMessage {
            socket_id,
            username: username.clone(),
        });
        state.hub.broadcast(&room_id, &departed, None).await;
    }

    state.registry.remove(socket_id).await;
    state.hub.unregister(socket_id).await;
}
