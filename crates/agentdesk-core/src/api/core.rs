//! DeskCore, the facade entry-point for all consumers

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tokio::sync::broadcast;

use crate::config::Settings;
use crate::store::AgentStore;

use super::events::CoreEvent;

/// Default broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// The Facade that wraps the agent store and settings.
///
/// Constructed via [`DeskCoreBuilder`](super::builder::DeskCoreBuilder).
pub struct DeskCore {
    /// Agent persistence
    store: Arc<dyn AgentStore>,
    /// Application settings
    settings: Arc<Settings>,
    /// Held for the whole read-compute-write span of every mutation
    write_lock: Mutex<()>,
    /// Broadcast sender for core events
    event_tx: broadcast::Sender<CoreEvent>,
}

impl DeskCore {
    /// Create a new DeskCore instance (prefer `DeskCoreBuilder`)
    pub(crate) fn new(store: Arc<dyn AgentStore>, settings: Arc<Settings>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            settings,
            write_lock: Mutex::new(()),
            event_tx,
        }
    }

    /// Access application settings (read-only)
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn store(&self) -> &dyn AgentStore {
        self.store.as_ref()
    }

    /// Serialize a mutation against every other mutation
    pub(crate) fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock()
    }

    pub(crate) fn event_sender(&self) -> &broadcast::Sender<CoreEvent> {
        &self.event_tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_desk_core_creation() {
        let core = DeskCore::new(Arc::new(MemoryStore::new()), Arc::new(Settings::default()));
        assert_eq!(core.settings().web.port, 5000);
        assert!(core.store().list_agents().unwrap().is_empty());
    }
}
