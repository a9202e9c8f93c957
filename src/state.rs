use std::sync::Arc;

use crate::db::dbcode::CodeStore;
use crate::ws::hub::RoomHub;
use crate::ws::registry::ConnectionRegistry;

/// Process-wide state, created once at startup and handed to every handler.
pub struct AppState {
    pub registry: ConnectionRegistry,
    pub hub: RoomHub,
    /// Document store; `None` when no database is configured, in which case
    /// the relay keeps working without persistence.
    pub store: Option<Arc<CodeStore>>,
}

impl AppState {
    pub fn new(store: Option<Arc<CodeStore>>) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            hub: RoomHub::new(),
            store,
        }
    }
}
