use parking_lot::RwLock;

use crate::agents::{Agent, AgentProfile};
use crate::distribution::Assignment;

use super::{AgentStore, AgentTable, StoreError};

/// Volatile store; the roster lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<AgentTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing table (used by tests and seeding)
    pub fn with_table(table: AgentTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }
}

impl AgentStore for MemoryStore {
    fn list_agents(&self) -> Result<Vec<Agent>, StoreError> {
        Ok(self.table.read().agents().to_vec())
    }

    fn get_agent(&self, id: &str) -> Result<Agent, StoreError> {
        self.table.read().get(id)
    }

    fn insert_agent(&self, agent: Agent) -> Result<Agent, StoreError> {
        self.table.write().insert(agent)
    }

    fn update_agent(&self, id: &str, profile: AgentProfile) -> Result<Agent, StoreError> {
        self.table.write().update(id, profile)
    }

    fn delete_agent(&self, id: &str) -> Result<Agent, StoreError> {
        self.table.write().delete(id)
    }

    fn replace_assignments(&self, assignment: &Assignment) -> Result<(), StoreError> {
        self.table.write().replace_assignments(assignment)
    }
}
