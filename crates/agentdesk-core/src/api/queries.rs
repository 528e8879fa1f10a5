//! Read-only query methods on [`DeskCore`].

use crate::agents::Agent;

use super::core::DeskCore;
use super::types::ApiError;

impl DeskCore {
    /// List all agents in registration order
    pub fn list_agents(&self) -> Result<Vec<Agent>, ApiError> {
        Ok(self.store().list_agents()?)
    }

    /// Get a single agent by id
    pub fn get_agent(&self, id: &str) -> Result<Agent, ApiError> {
        Ok(self.store().get_agent(id)?)
    }

    pub fn agent_count(&self) -> Result<usize, ApiError> {
        Ok(self.store().list_agents()?.len())
    }

    /// Total number of tasks currently held across all agents
    pub fn assigned_task_count(&self) -> Result<usize, ApiError> {
        Ok(self
            .store()
            .list_agents()?
            .iter()
            .map(Agent::task_count)
            .sum())
    }
}
