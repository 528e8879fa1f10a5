//! Agent roster types

mod types;

pub use types::{Agent, AgentId, AgentProfile, ProfileError};
