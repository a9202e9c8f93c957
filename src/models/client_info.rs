use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One presence entry: a connection currently in a room.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub socket_id: Uuid,
    pub username: String,
}
