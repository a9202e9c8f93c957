use std::collections::{HashMap, HashSet};

use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tracing::error;
use uuid::Uuid;

use crate::models::ServerMessage;

/// Outbound channel for one connection; the socket's send task drains it.
pub type PeerSender = UnboundedSender<Message>;

#[derive(Default)]
struct HubInner {
    /// room id -> member connection ids. Source of truth for membership.
    rooms: HashMap<String, HashSet<Uuid>>,
    /// connection id -> outbound channel. Delivery mechanism only.
    peers: HashMap<Uuid, PeerSender>,
}

/// Room membership and event fan-out.
///
/// Delivery is fire-and-forget: no acknowledgment, no retry. A peer whose
/// channel is gone simply misses the message.
#[derive(Default)]
pub struct RoomHub {
    inner: RwLock<HubInner>,
}

impl RoomHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a connection's outbound channel.
    pub async fn register(&self, socket_id: Uuid, sender: PeerSender) {
        self.inner.write().await.peers.insert(socket_id, sender);
    }

    /// Detach the outbound channel. A no-op when absent.
    pub async fn unregister(&self, socket_id: Uuid) {
        self.inner.write().await.peers.remove(&socket_id);
    }

    /// Add a connection to a room. Duplicate joins are idempotent, and a
    /// connection may belong to several rooms at once.
    pub async fn join(&self, socket_id: Uuid, room_id: &str) {
        self.inner
            .write()
            .await
            .rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(socket_id);
    }

    /// Current members of a room.
    pub async fn members_of(&self, room_id: &str) -> Vec<Uuid> {
        self.inner
            .read()
            .await
            .rooms
            .get(room_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Send a message to a single connection.
    pub async fn send_to(&self, socket_id: Uuid, msg: &ServerMessage) {
        let Some(text) = encode(msg) else { return };
        if let Some(sender) = self.inner.read().await.peers.get(&socket_id) {
            let _ = sender.send(Message::Text(text));
        }
    }

    /// Deliver a message to every member of a room except `exclude`.
    pub async fn broadcast(&self, room_id: &str, msg: &ServerMessage, exclude: Option<Uuid>) {
        let Some(text) = encode(msg) else { return };
        let inner = self.inner.read().await;
        let Some(members) = inner.rooms.get(room_id) else {
            return;
        };
        for member in members {
            if Some(*member) == exclude {
                continue;
            }
            if let Some(sender) = inner.peers.get(member) {
                let _ = sender.send(Message::Text(text.clone()));
            }
        }
    }

    /// Remove the connection from every room it joined, returning those
    /// rooms so departure notifications can go out. Membership sets left
    /// empty are pruned; the persisted documents are untouched.
    pub async fn leave_all(&self, socket_id: Uuid) -> Vec<String> {
        let mut inner = self.inner.write().await;
        let mut left = Vec::new();
        inner.rooms.retain(|room_id, members| {
            if members.remove(&socket_id) {
                left.push(room_id.clone());
            }
            !members.is_empty()
        });
        left
    }
}

fn encode(msg: &ServerMessage) -> Option<String> {
    match serde_json::to_string(msg) {
        Ok(text) => Some(text),
        Err(e) => {
            error!("Failed to serialize server message: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CodeMessage;
    use tokio::sync::mpsc;

    fn code_msg(code: &str) -> ServerMessage {
        ServerMessage::CodeChange(CodeMessage {
            code: code.to_string(),
        })
    }

    fn recv_code(rx: &mut mpsc::UnboundedReceiver<Message>) -> Option<String> {
        match rx.try_recv() {
            Ok(Message::Text(text)) => match serde_json::from_str(&text) {
                Ok(ServerMessage::CodeChange(msg)) => Some(msg.code),
                _ => None,
            },
            _ => None,
        }
    }

    #[tokio::test]
    async fn broadcast_excludes_the_sender() {
        let hub = RoomHub::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.register(a, tx_a).await;
        hub.register(b, tx_b).await;
        hub.join(a, "abc123").await;
        hub.join(b, "abc123").await;

        hub.broadcast("abc123", &code_msg("print(1)"), Some(a)).await;

        assert_eq!(recv_code(&mut rx_b).as_deref(), Some("print(1)"));
        assert!(rx_a.try_recv().is_err(), "sender must not get an echo");
    }

    #[tokio::test]
    async fn broadcast_without_exclusion_reaches_everyone() {
        let hub = RoomHub::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.register(a, tx_a).await;
        hub.register(b, tx_b).await;
        hub.join(a, "abc123").await;
        hub.join(b, "abc123").await;

        hub.broadcast("abc123", &code_msg("x"), None).await;

        assert!(recv_code(&mut rx_a).is_some());
        assert!(recv_code(&mut rx_b).is_some());
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let hub = RoomHub::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.register(a, tx_a).await;
        hub.register(b, tx_b).await;
        hub.join(a, "room-1").await;
        hub.join(b, "room-2").await;

        hub.broadcast("room-2", &code_msg("y"), None).await;

        assert!(rx_a.try_recv().is_err(), "room-1 must not see room-2 traffic");
        assert!(recv_code(&mut rx_b).is_some());
    }

    #[tokio::test]
    async fn duplicate_join_is_idempotent() {
        let hub = RoomHub::new();
        let a = Uuid::new_v4();
        let (tx, _rx) = mpsc::unbounded_channel();
        hub.register(a, tx).await;
        hub.join(a, "abc123").await;
        hub.join(a, "abc123").await;

        assert_eq!(hub.members_of("abc123").await, vec![a]);
    }

    #[tokio::test]
    async fn leave_all_reports_every_room_and_prunes() {
        let hub = RoomHub::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        hub.register(a, tx_a).await;
        hub.register(b, tx_b).await;
        hub.join(a, "room-1").await;
        hub.join(a, "room-2").await;
        hub.join(b, "room-2").await;

        let mut left = hub.leave_all(a).await;
        left.sort();
        assert_eq!(left, vec!["room-1".to_string(), "room-2".to_string()]);

        // room-1 is empty and pruned, room-2 keeps its remaining member
        assert!(hub.members_of("room-1").await.is_empty());
        assert_eq!(hub.members_of("room-2").await, vec![b]);

        // A second teardown finds nothing
        assert!(hub.leave_all(a).await.is_empty());
    }

    #[tokio::test]
    async fn delivery_to_a_gone_peer_is_dropped_silently() {
        let hub = RoomHub::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.register(a, tx_a).await;
        hub.register(b, tx_b).await;
        hub.join(a, "abc123").await;
        hub.join(b, "abc123").await;

        // Peer A's transport is gone but membership was not yet torn down
        drop(rx_a);
        hub.broadcast("abc123", &code_msg("z"), None).await;

        assert!(recv_code(&mut rx_b).is_some());
    }
}
