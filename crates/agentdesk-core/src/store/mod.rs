//! Agent persistence.
//!
//! [`AgentStore`] is the seam between the facade and storage. Both
//! implementations keep an ordered [`AgentTable`] in memory; [`FileStore`]
//! additionally commits every change to a JSON snapshot before exposing it.

mod file;
mod memory;
mod table;

use thiserror::Error;

use crate::agents::{Agent, AgentProfile};
use crate::distribution::Assignment;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use table::AgentTable;

/// Errors returned by agent stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("agent not found: {id}")]
    AgentNotFound { id: String },

    #[error("agent with email {email} already exists")]
    DuplicateEmail { email: String },

    #[error("assignment references unknown agent: {id}")]
    UnknownAgent { id: String },

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Storage for the agent roster and its task assignments.
///
/// Agents are kept in registration order, which is the order the
/// distributor hands out extra records in.
pub trait AgentStore: Send + Sync {
    /// All agents in registration order
    fn list_agents(&self) -> Result<Vec<Agent>, StoreError>;

    fn get_agent(&self, id: &str) -> Result<Agent, StoreError>;

    /// Register a new agent. Fails if the email is already taken.
    fn insert_agent(&self, agent: Agent) -> Result<Agent, StoreError>;

    /// Replace an agent's editable fields, keeping its tasks
    fn update_agent(&self, id: &str, profile: AgentProfile) -> Result<Agent, StoreError>;

    /// Remove an agent and return it
    fn delete_agent(&self, id: &str) -> Result<Agent, StoreError>;

    /// Apply a distribution as one batch.
    ///
    /// Every agent's task list is replaced: agents in the assignment get
    /// their slot, all others are cleared. If the assignment names an agent
    /// that does not exist nothing is changed.
    fn replace_assignments(&self, assignment: &Assignment) -> Result<(), StoreError>;
}
