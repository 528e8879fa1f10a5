//! Public API layer (Facade) for agentdesk-core.
//!
//! [`DeskCore`] owns the agent store and settings and exposes typed query
//! and action methods. The web server and any other consumer should go
//! through it instead of talking to an [`AgentStore`](crate::store::AgentStore)
//! directly, so that every write path is serialized and announced.
//!
//! # Quick Start
//!
//! ```ignore
//! use agentdesk_core::api::DeskCoreBuilder;
//!
//! let core = DeskCoreBuilder::new(settings).open()?;
//! let agent = core.add_agent(profile)?;
//! let outcome = core.upload_contacts(&csv_bytes)?;
//! println!("{}", outcome.message());
//! ```

mod actions;
mod builder;
mod core;
pub mod events;
mod queries;
pub mod types;

pub use builder::DeskCoreBuilder;
pub use core::DeskCore;
pub use events::CoreEvent;
pub use types::{ApiError, DistributionKind, DistributionOutcome};
