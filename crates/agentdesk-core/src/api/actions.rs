//! Action methods on [`DeskCore`].
//!
//! Every method here holds the write lock for its whole span, so a
//! distribution's list → compute → replace sequence never interleaves with
//! another mutation. The new assignment is computed in full before the store
//! is touched and then applied as one batch.

use crate::agents::{Agent, AgentProfile};
use crate::contacts::{parse_and_validate, ContactRecord};
use crate::distribution::{distribute, pool_assigned_tasks};

use super::core::DeskCore;
use super::events::CoreEvent;
use super::types::{ApiError, DistributionKind, DistributionOutcome};

impl DeskCore {
    // =========================================================
    // Distribution
    // =========================================================

    /// Parse an uploaded contact CSV and distribute its rows across all
    /// agents, replacing every existing assignment.
    pub fn upload_contacts(&self, raw: &[u8]) -> Result<DistributionOutcome, ApiError> {
        let records = parse_and_validate(raw, self.settings().ingest.column_check)
            .inspect_err(|e| tracing::warn!("Rejected contact upload: {e:?}"))?;

        let _guard = self.lock_writes();
        let agents = self.store().list_agents()?;
        self.apply_distribution(DistributionKind::Upload, records, &agents)
    }

    /// Pool every agent's current tasks and distribute them again.
    pub fn reassign_tasks(&self) -> Result<DistributionOutcome, ApiError> {
        let _guard = self.lock_writes();
        let agents = self.store().list_agents()?;
        if agents.is_empty() {
            return Err(ApiError::NoAgentsAvailable);
        }

        let pooled = pool_assigned_tasks(&agents);
        if pooled.is_empty() {
            return Err(ApiError::NoTasksToReassign);
        }

        self.apply_distribution(DistributionKind::Reassign, pooled, &agents)
    }

    /// Compute and store a distribution. Caller holds the write lock.
    fn apply_distribution(
        &self,
        kind: DistributionKind,
        records: Vec<ContactRecord>,
        agents: &[Agent],
    ) -> Result<DistributionOutcome, ApiError> {
        let agent_ids: Vec<String> = agents.iter().map(|a| a.id.clone()).collect();
        let assignment = distribute(records, &agent_ids)?;
        let summary = *assignment.summary();

        tracing::info!(
            "{:?}: {} tasks among {} agents ({} base + {} extra)",
            kind,
            summary.total,
            summary.agent_count,
            summary.base,
            summary.extra
        );
        for (agent, slot) in agents.iter().zip(assignment.slots()) {
            tracing::debug!("Agent {} ({}): {} tasks", agent.name, agent.id, slot.tasks.len());
        }

        self.store().replace_assignments(&assignment)?;
        let agents = self.store().list_agents()?;

        self.emit(CoreEvent::TasksDistributed {
            total: summary.total,
            agent_count: summary.agent_count,
        });
        self.emit(CoreEvent::AgentsUpdated);

        Ok(DistributionOutcome {
            kind,
            summary,
            agents,
        })
    }

    // =========================================================
    // Agent management
    // =========================================================

    /// Register a new agent with an empty task list
    pub fn add_agent(&self, profile: AgentProfile) -> Result<Agent, ApiError> {
        let profile = profile.normalized()?;
        let _guard = self.lock_writes();
        let agent = self.store().insert_agent(Agent::new(profile))?;
        tracing::info!("Added agent {} ({})", agent.name, agent.id);
        self.emit(CoreEvent::AgentsUpdated);
        Ok(agent)
    }

    /// Update an agent's name, email and mobile. Tasks are kept.
    pub fn update_agent(&self, id: &str, profile: AgentProfile) -> Result<Agent, ApiError> {
        let profile = profile.normalized()?;
        let _guard = self.lock_writes();
        let agent = self.store().update_agent(id, profile)?;
        tracing::info!("Updated agent {} ({})", agent.name, agent.id);
        self.emit(CoreEvent::AgentsUpdated);
        Ok(agent)
    }

    /// Remove an agent. Its tasks are dropped, not redistributed.
    pub fn delete_agent(&self, id: &str) -> Result<Agent, ApiError> {
        let _guard = self.lock_writes();
        let agent = self.store().delete_agent(id)?;
        tracing::info!(
            "Deleted agent {} ({}), dropping {} tasks",
            agent.name,
            agent.id,
            agent.task_count()
        );
        self.emit(CoreEvent::AgentsUpdated);
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::agents::{Agent, AgentProfile};
    use crate::api::types::ApiError;
    use crate::api::{DeskCore, DeskCoreBuilder, DistributionKind};
    use crate::config::Settings;
    use crate::contacts::{ColumnCheck, ContactRecord, IngestError};
    use crate::store::{AgentStore, AgentTable, MemoryStore};
    use pretty_assertions::assert_eq;

    fn core() -> DeskCore {
        DeskCoreBuilder::new(Settings::default()).build()
    }

    fn core_with_agents(n: usize) -> (DeskCore, Vec<Agent>) {
        let core = core();
        let agents = (0..n)
            .map(|i| {
                core.add_agent(AgentProfile::new(
                    format!("Agent {i}"),
                    format!("agent{i}@x.io"),
                    "+1 555",
                ))
                .unwrap()
            })
            .collect();
        (core, agents)
    }

    fn csv(rows: usize) -> Vec<u8> {
        let mut out = String::from("FirstName,Phone,Notes\n");
        for i in 0..rows {
            out.push_str(&format!("Contact{i},555-{i:04},note {i}\n"));
        }
        out.into_bytes()
    }

    fn counts(agents: &[Agent]) -> Vec<usize> {
        agents.iter().map(Agent::task_count).collect()
    }

    #[test]
    fn test_upload_distributes_with_extra_to_first_agent() {
        let (core, _) = core_with_agents(3);
        let outcome = core.upload_contacts(&csv(7)).unwrap();

        assert_eq!(outcome.kind, DistributionKind::Upload);
        assert_eq!(counts(&outcome.agents), vec![3, 2, 2]);
        assert_eq!(
            outcome.message(),
            "Distributed 7 tasks among 3 agents (2 base + 1 extra)"
        );
        assert_eq!(counts(&core.list_agents().unwrap()), vec![3, 2, 2]);
        assert_eq!(outcome.agents[0].assigned_tasks[0].first_name, "Contact0");
        assert_eq!(outcome.agents[2].assigned_tasks[1].first_name, "Contact6");
    }

    #[test]
    fn test_upload_replaces_previous_assignment() {
        let (core, _) = core_with_agents(2);
        core.upload_contacts(&csv(9)).unwrap();
        let outcome = core.upload_contacts(&csv(2)).unwrap();
        assert_eq!(counts(&outcome.agents), vec![1, 1]);
    }

    #[test]
    fn test_upload_without_agents() {
        let core = core();
        assert!(matches!(
            core.upload_contacts(&csv(3)),
            Err(ApiError::NoAgentsAvailable)
        ));
    }

    #[test]
    fn test_upload_validates_before_checking_agents() {
        let core = core();
        assert!(matches!(
            core.upload_contacts(b"FirstName,Phone,Notes\n"),
            Err(ApiError::Ingest(IngestError::EmptyInput))
        ));
    }

    #[test]
    fn test_rejected_upload_keeps_existing_tasks() {
        let (core, _) = core_with_agents(2);
        core.upload_contacts(&csv(4)).unwrap();

        let err = core.upload_contacts(b"Name,Phone\nA,1\n").unwrap_err();
        assert!(matches!(err, ApiError::Ingest(IngestError::MissingColumns)));
        assert_eq!(counts(&core.list_agents().unwrap()), vec![2, 2]);
    }

    #[test]
    fn test_upload_honours_first_row_column_check() {
        let mut settings = Settings::default();
        settings.ingest.column_check = ColumnCheck::FirstRow;
        let core = DeskCoreBuilder::new(settings).build();
        core.add_agent(AgentProfile::new("A", "a@x.io", "+1"))
            .unwrap();

        let err = core
            .upload_contacts(b"FirstName,Phone,Notes\nAda,111,\n")
            .unwrap_err();
        assert!(matches!(err, ApiError::Ingest(IngestError::MissingColumns)));
    }

    #[test]
    fn test_reassign_pools_existing_tasks() {
        let records: Vec<ContactRecord> = (0..5)
            .map(|i| ContactRecord::new(format!("C{i}"), "1", ""))
            .collect();
        let mut first = Agent::new(AgentProfile::new("A", "a@x.io", "+1"));
        let mut second = Agent::new(AgentProfile::new("B", "b@x.io", "+1"));
        // Uneven starting point: [1, 4]
        first.assigned_tasks = records[0..1].to_vec();
        second.assigned_tasks = records[1..5].to_vec();

        let mut table = AgentTable::default();
        table.insert(first).unwrap();
        table.insert(second).unwrap();
        let core = DeskCoreBuilder::new(Settings::default())
            .with_store(Arc::new(MemoryStore::with_table(table)))
            .build();

        let outcome = core.reassign_tasks().unwrap();
        assert_eq!(outcome.kind, DistributionKind::Reassign);
        assert_eq!(counts(&outcome.agents), vec![3, 2]);
        assert_eq!(outcome.summary.total, 5);
        assert_eq!(
            outcome.message(),
            "Reassigned 5 tasks among 2 agents (2 base + 1 extra)"
        );

        let rejoined: Vec<ContactRecord> = outcome
            .agents
            .iter()
            .flat_map(|a| a.assigned_tasks.iter().cloned())
            .collect();
        assert_eq!(rejoined, records);
    }

    #[test]
    fn test_reassign_after_new_agent_joins() {
        let (core, _) = core_with_agents(2);
        core.upload_contacts(&csv(6)).unwrap();
        core.add_agent(AgentProfile::new("Late", "late@x.io", "+1"))
            .unwrap();

        let outcome = core.reassign_tasks().unwrap();
        assert_eq!(counts(&outcome.agents), vec![2, 2, 2]);
    }

    #[test]
    fn test_reassign_without_agents() {
        assert!(matches!(
            core().reassign_tasks(),
            Err(ApiError::NoAgentsAvailable)
        ));
    }

    #[test]
    fn test_reassign_without_tasks() {
        let (core, _) = core_with_agents(2);
        assert!(matches!(
            core.reassign_tasks(),
            Err(ApiError::NoTasksToReassign)
        ));
    }

    #[test]
    fn test_add_agent_validates_and_rejects_duplicates() {
        let core = core();
        assert!(matches!(
            core.add_agent(AgentProfile::new("", "a@x.io", "+1")),
            Err(ApiError::InvalidInput { .. })
        ));

        core.add_agent(AgentProfile::new("A", "a@x.io", "+1"))
            .unwrap();
        assert!(matches!(
            core.add_agent(AgentProfile::new("Other", "A@X.io", "+2")),
            Err(ApiError::DuplicateEmail { .. })
        ));
        assert_eq!(core.agent_count().unwrap(), 1);
    }

    #[test]
    fn test_update_agent_keeps_tasks() {
        let (core, agents) = core_with_agents(1);
        core.upload_contacts(&csv(3)).unwrap();

        let updated = core
            .update_agent(&agents[0].id, AgentProfile::new("Renamed", "new@x.io", "+44"))
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.task_count(), 3);
    }

    #[test]
    fn test_update_missing_agent() {
        let core = core();
        assert!(matches!(
            core.update_agent("missing", AgentProfile::new("A", "a@x.io", "+1")),
            Err(ApiError::AgentNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_agent_drops_its_tasks() {
        let (core, agents) = core_with_agents(2);
        core.upload_contacts(&csv(5)).unwrap();

        let removed = core.delete_agent(&agents[0].id).unwrap();
        assert_eq!(removed.task_count(), 3);
        assert_eq!(core.assigned_task_count().unwrap(), 2);
        assert!(matches!(
            core.delete_agent(&agents[0].id),
            Err(ApiError::AgentNotFound { .. })
        ));
    }

    #[test]
    fn test_concurrent_uploads_leave_a_consistent_assignment() {
        let (core, _) = core_with_agents(3);
        let core = Arc::new(core);

        let handles: Vec<_> = [7usize, 10, 4, 12]
            .into_iter()
            .map(|rows| {
                let core = Arc::clone(&core);
                std::thread::spawn(move || core.upload_contacts(&csv(rows)).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let agents = core.list_agents().unwrap();
        let total: usize = agents.iter().map(Agent::task_count).sum();
        assert!([7, 10, 4, 12].contains(&total));
        let expected = crate::distribution::DistributionSummary::plan(total, 3).unwrap();
        let expected_counts: Vec<usize> = (0..3).map(|i| expected.share_for(i)).collect();
        assert_eq!(counts(&agents), expected_counts);
    }

    #[test]
    fn test_store_is_used_through_trait() {
        let store: Arc<dyn AgentStore> = Arc::new(MemoryStore::new());
        let core = DeskCoreBuilder::new(Settings::default())
            .with_store(store.clone())
            .build();
        core.add_agent(AgentProfile::new("A", "a@x.io", "+1"))
            .unwrap();
        assert_eq!(store.list_agents().unwrap().len(), 1);
    }
}
