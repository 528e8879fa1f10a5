//! Round-robin task distribution.
//!
//! Given N records and M agents, every agent receives `N / M` records and the
//! first `N % M` agents (in the order supplied) receive one more. Records are
//! handed out as contiguous slices, so concatenating the agents' lists in
//! order reproduces the input.

use serde::Serialize;
use thiserror::Error;

use crate::agents::{Agent, AgentId};
use crate::contacts::ContactRecord;

/// Errors from a distribution run
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DistributionError {
    /// The agent list was empty
    #[error("No agents found. Please add agents first.")]
    NoAgentsAvailable,
}

/// Shape of a distribution: how many records, over how many agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistributionSummary {
    pub total: usize,
    pub agent_count: usize,
    /// Records every agent receives
    pub base: usize,
    /// Number of leading agents that receive one extra record
    pub extra: usize,
}

impl DistributionSummary {
    /// Plan a distribution. Returns `None` when there are no agents.
    pub fn plan(total: usize, agent_count: usize) -> Option<Self> {
        if agent_count == 0 {
            return None;
        }
        Some(Self {
            total,
            agent_count,
            base: total / agent_count,
            extra: total % agent_count,
        })
    }

    /// Number of records for the agent at `position`
    pub fn share_for(&self, position: usize) -> usize {
        self.base + usize::from(position < self.extra)
    }
}

/// Records assigned to one agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTasks {
    pub agent_id: AgentId,
    pub tasks: Vec<ContactRecord>,
}

/// Result of one distribution run, in agent order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    summary: DistributionSummary,
    slots: Vec<AgentTasks>,
}

impl Assignment {
    pub fn summary(&self) -> &DistributionSummary {
        &self.summary
    }

    pub fn slots(&self) -> &[AgentTasks] {
        &self.slots
    }

    /// Tasks assigned to `agent_id`, if the agent took part
    pub fn tasks_for(&self, agent_id: &str) -> Option<&[ContactRecord]> {
        self.slots
            .iter()
            .find(|slot| slot.agent_id == agent_id)
            .map(|slot| slot.tasks.as_slice())
    }

    /// Task counts per agent, in agent order
    pub fn counts(&self) -> Vec<usize> {
        self.slots.iter().map(|slot| slot.tasks.len()).collect()
    }
}

/// Split `records` across `agents`.
///
/// Pure: the same inputs always produce the same assignment. An empty record
/// list is valid and yields an empty list for every agent.
pub fn distribute(
    records: Vec<ContactRecord>,
    agents: &[AgentId],
) -> Result<Assignment, DistributionError> {
    let summary = DistributionSummary::plan(records.len(), agents.len())
        .ok_or(DistributionError::NoAgentsAvailable)?;

    let mut remaining = records.into_iter();
    let mut cursor = 0;
    let mut slots = Vec::with_capacity(agents.len());

    for (position, agent_id) in agents.iter().enumerate() {
        let take = summary.share_for(position);
        let tasks: Vec<ContactRecord> = remaining.by_ref().take(take).collect();
        debug_assert_eq!(tasks.len(), take);
        cursor += take;
        slots.push(AgentTasks {
            agent_id: agent_id.clone(),
            tasks,
        });
    }

    debug_assert_eq!(cursor, summary.total);
    debug_assert!(remaining.next().is_none());

    Ok(Assignment { summary, slots })
}

/// Pool every agent's current tasks, agent by agent, preserving order
pub fn pool_assigned_tasks(agents: &[Agent]) -> Vec<ContactRecord> {
    agents
        .iter()
        .flat_map(|agent| agent.assigned_tasks.iter().cloned())
        .collect()
}
