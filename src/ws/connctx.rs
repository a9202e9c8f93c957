use std::collections::HashSet;
use uuid::Uuid;

/// Lifecycle of one connection. `Disconnected` is implicit: the context is
/// dropped with the socket task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnState {
    Connected,
    Joined { rooms: HashSet<String> },
}

/// Per-connection context: the server-assigned id and where the connection
/// is in the join protocol.
#[derive(Debug)]
pub struct ConnCtx {
    pub socket_id: Uuid,
    state: ConnState,
}

impl ConnCtx {
    pub fn new(socket_id: Uuid) -> Self {
        Self {
            socket_id,
            state: ConnState::Connected,
        }
    }

    /// Transition `Connected -> Joined`, or record one more room when
    /// already joined.
    pub fn joined(&mut self, room_id: &str) {
        match &mut self.state {
            ConnState::Connected => {
                self.state = ConnState::Joined {
                    rooms: HashSet::from([room_id.to_string()]),
                };
            }
            ConnState::Joined { rooms } => {
                rooms.insert(room_id.to_string());
            }
        }
    }

    /// Whether this connection has joined the given room. An edit naming
    /// any other room is an illegal event sequence and gets dropped by the
    /// caller.
    pub fn is_member(&self, room_id: &str) -> bool {
        matches!(&self.state, ConnState::Joined { rooms } if rooms.contains(room_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_connection_is_member_of_nothing() {
        let ctx = ConnCtx::new(Uuid::new_v4());
        assert!(!ctx.is_member("abc123"));
    }

    #[test]
    fn join_transitions_to_member() {
        let mut ctx = ConnCtx::new(Uuid::new_v4());
        ctx.joined("abc123");
        assert!(ctx.is_member("abc123"));
        assert!(!ctx.is_member("other"));
    }

    #[test]
    fn a_connection_may_join_several_rooms() {
        let mut ctx = ConnCtx::new(Uuid::new_v4());
        ctx.joined("room-1");
        ctx.joined("room-2");
        assert!(ctx.is_member("room-1"));
        assert!(ctx.is_member("room-2"));
    }

    #[test]
    fn duplicate_join_is_idempotent() {
        let mut ctx = ConnCtx::new(Uuid::new_v4());
        ctx.joined("abc123");
        ctx.joined("abc123");
        assert!(ctx.is_member("abc123"));
    }
}
