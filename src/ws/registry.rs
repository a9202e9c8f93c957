use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Mapping from live connection id to display name.
///
/// Entries live from join to disconnect; nothing here is persisted.
#[derive(Default)]
pub struct ConnectionRegistry {
    names: RwLock<HashMap<Uuid, String>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a display name with a connection, overwriting silently.
    pub async fn set_name(&self, socket_id: Uuid, username: String) {
        self.names.write().await.insert(socket_id, username);
    }

    pub async fn name_of(&self, socket_id: Uuid) -> Option<String> {
        self.names.read().await.get(&socket_id).cloned()
    }

    /// Delete the association. A no-op when absent.
    pub async fn remove(&self, socket_id: Uuid) {
        self.names.write().await.remove(&socket_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn name_round_trip() {
        let registry = ConnectionRegistry::new();
        let id = Uuid::new_v4();
        assert_eq!(registry.name_of(id).await, None);

        registry.set_name(id, "alice".to_string()).await;
        assert_eq!(registry.name_of(id).await, Some("alice".to_string()));
    }

    #[tokio::test]
    async fn set_name_overwrites_silently() {
        let registry = ConnectionRegistry::new();
        let id = Uuid::new_v4();
        registry.set_name(id, "alice".to_string()).await;
        registry.set_name(id, "alicia".to_string()).await;
        assert_eq!(registry.name_of(id).await, Some("alicia".to_string()));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let id = Uuid::new_v4();
        registry.set_name(id, "bob".to_string()).await;
        registry.remove(id).await;
        assert_eq!(registry.name_of(id).await, None);
        // Removing again is a no-op
        registry.remove(id).await;
        assert_eq!(registry.name_of(id).await, None);
    }
}
