use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agents::{Agent, AgentProfile};
use crate::contacts::ContactRecord;
use crate::distribution::Assignment;

use super::StoreError;

/// Ordered agent table shared by the store implementations.
///
/// This is also the on-disk snapshot format of [`super::FileStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTable {
    #[serde(default)]
    agents: Vec<Agent>,
}

impl AgentTable {
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.agents
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| StoreError::AgentNotFound { id: id.to_string() })
    }

    fn ensure_email_free(&self, email: &str, except_id: Option<&str>) -> Result<(), StoreError> {
        let taken = self
            .agents
            .iter()
            .any(|a| a.email == email && Some(a.id.as_str()) != except_id);
        if taken {
            return Err(StoreError::DuplicateEmail {
                email: email.to_string(),
            });
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Agent, StoreError> {
        let pos = self.position(id)?;
        Ok(self.agents[pos].clone())
    }

    pub fn insert(&mut self, agent: Agent) -> Result<Agent, StoreError> {
        self.ensure_email_free(&agent.email, None)?;
        self.agents.push(agent.clone());
        Ok(agent)
    }

    pub fn update(&mut self, id: &str, profile: AgentProfile) -> Result<Agent, StoreError> {
        let pos = self.position(id)?;
        self.ensure_email_free(&profile.email, Some(id))?;
        let agent = &mut self.agents[pos];
        agent.apply_profile(profile);
        Ok(agent.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<Agent, StoreError> {
        let pos = self.position(id)?;
        Ok(self.agents.remove(pos))
    }

    pub fn replace_assignments(&mut self, assignment: &Assignment) -> Result<(), StoreError> {
        if let Some(slot) = assignment
            .slots()
            .iter()
            .find(|slot| !self.agents.iter().any(|a| a.id == slot.agent_id))
        {
            return Err(StoreError::UnknownAgent {
                id: slot.agent_id.clone(),
            });
        }

        let mut incoming: HashMap<&str, &[ContactRecord]> = assignment
            .slots()
            .iter()
            .map(|slot| (slot.agent_id.as_str(), slot.tasks.as_slice()))
            .collect();

        for agent in &mut self.agents {
            agent.assigned_tasks = incoming
                .remove(agent.id.as_str())
                .map(<[ContactRecord]>::to_vec)
                .unwrap_or_default();
        }
        Ok(())
    }
}
