//! Builder for constructing a [`DeskCore`] instance.
//!
//! ```ignore
//! let core = DeskCoreBuilder::new(settings)
//!     .with_store(Arc::new(MemoryStore::new()))
//!     .build();
//! ```

use std::sync::Arc;

use crate::config::Settings;
use crate::store::{AgentStore, FileStore, MemoryStore, StoreError};

use super::core::DeskCore;

/// Builder for constructing a [`DeskCore`] Facade instance
pub struct DeskCoreBuilder {
    settings: Arc<Settings>,
    store: Option<Arc<dyn AgentStore>>,
}

impl DeskCoreBuilder {
    /// Create a new builder with the given settings
    pub fn new(settings: Settings) -> Self {
        Self::from_shared_settings(Arc::new(settings))
    }

    /// Create a new builder from an already-shared settings
    pub fn from_shared_settings(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            store: None,
        }
    }

    /// Use an existing store instead of the one implied by the settings
    pub fn with_store(mut self, store: Arc<dyn AgentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build with the given store, or a fresh `MemoryStore`.
    ///
    /// Ignores `storage.path`; use [`open`](Self::open) to honour it.
    pub fn build(self) -> DeskCore {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        DeskCore::new(store, self.settings)
    }

    /// Build, opening a `FileStore` when `storage.path` is configured and no
    /// store was given explicitly.
    pub fn open(self) -> Result<DeskCore, StoreError> {
        let store: Arc<dyn AgentStore> = match (self.store, &self.settings.storage.path) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(FileStore::open(path)?),
            (None, None) => {
                tracing::info!("No storage path configured, agents are kept in memory");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(DeskCore::new(store, self.settings))
    }
}
