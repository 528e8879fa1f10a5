//! Core event system for push-based change notification.

use tokio::sync::broadcast;

use super::core::DeskCore;

/// Events emitted by the core after a successful mutation.
///
/// Consumers call [`DeskCore::subscribe()`] to receive these events
/// via a `broadcast::Receiver`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// The roster or any agent's tasks changed
    AgentsUpdated,

    /// A contact upload or reassignment was applied
    TasksDistributed {
        /// Number of records distributed
        total: usize,
        /// Number of agents that took part
        agent_count: usize,
    },
}

impl DeskCore {
    /// Subscribe to core events.
    ///
    /// If the receiver falls behind, older events are dropped (lagged).
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.event_sender().subscribe()
    }

    /// Send an event; ignored if no subscribers are listening
    pub(crate) fn emit(&self, event: CoreEvent) {
        let _ = self.event_sender().send(event);
    }
}
