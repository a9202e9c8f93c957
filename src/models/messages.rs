use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ClientInfo;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JoinMessage {
    pub room_id: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CodeChangeMessage {
    pub room_id: String,
    pub code: String,
}

/// Server-side `code-change` payload: the join snapshot and the edit relay
/// share this shape.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CodeMessage {
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JoinedMessage {
    pub clients: Vec<ClientInfo>,
    pub username: String,
    pub socket_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectedMessage {
    pub socket_id: Uuid,
    pub username: String,
}

/// Messages received from a client over the WebSocket.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "join")]
    Join(JoinMessage),
    #[serde(rename = "code-change")]
    CodeChange(CodeChangeMessage),
}

/// Messages sent to clients.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "code-change")]
    CodeChange(CodeMessage),
    #[serde(rename = "joined")]
    Joined(JoinedMessage),
    #[serde(rename = "disconnected")]
    Disconnected(DisconnectedMessage),
}
