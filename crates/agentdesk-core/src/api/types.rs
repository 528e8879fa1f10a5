//! Result and error types for the Facade API.

use serde::Serialize;
use thiserror::Error;

use crate::agents::{Agent, ProfileError};
use crate::contacts::IngestError;
use crate::distribution::{DistributionError, DistributionSummary};
use crate::store::StoreError;

/// Error type for Facade API operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// A distribution was requested with no registered agents
    #[error("No agents found. Please add agents first.")]
    NoAgentsAvailable,

    /// Reassignment found no tasks held by any agent
    #[error("No tasks to reassign")]
    NoTasksToReassign,

    /// The uploaded contact list was rejected
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// An agent payload failed validation
    #[error("{message}")]
    InvalidInput { message: String },

    /// Another agent already uses this email
    #[error("Agent with this email already exists")]
    DuplicateEmail { email: String },

    /// The requested agent was not found
    #[error("Agent not found")]
    AgentNotFound { id: String },

    /// The store could not complete the operation
    #[error("Storage failure: {message}")]
    PersistenceFailure { message: String },
}

impl From<DistributionError> for ApiError {
    fn from(err: DistributionError) -> Self {
        match err {
            DistributionError::NoAgentsAvailable => ApiError::NoAgentsAvailable,
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        ApiError::InvalidInput {
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AgentNotFound { id } => ApiError::AgentNotFound { id },
            StoreError::DuplicateEmail { email } => ApiError::DuplicateEmail { email },
            other => ApiError::PersistenceFailure {
                message: other.to_string(),
            },
        }
    }
}

/// Which operation produced a distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
    /// Fresh contact list upload
    Upload,
    /// Re-pooling of already assigned tasks
    Reassign,
}

impl DistributionKind {
    fn verb(self) -> &'static str {
        match self {
            DistributionKind::Upload => "Distributed",
            DistributionKind::Reassign => "Reassigned",
        }
    }
}

/// Outcome of an upload or reassignment
#[derive(Debug, Clone, Serialize)]
pub struct DistributionOutcome {
    pub kind: DistributionKind,
    pub summary: DistributionSummary,
    /// The roster as stored after the distribution was applied
    pub agents: Vec<Agent>,
}

impl DistributionOutcome {
    /// Human-readable description, e.g.
    /// `Distributed 7 tasks among 3 agents (2 base + 1 extra)`
    pub fn message(&self) -> String {
        format!(
            "{} {} tasks among {} agents ({} base + {} extra)",
            self.kind.verb(),
            self.summary.total,
            self.summary.agent_count,
            self.summary.base,
            self.summary.extra
        )
    }
}
