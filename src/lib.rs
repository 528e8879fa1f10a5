//! agentdesk - agent roster service with contact list distribution.
//!
//! The domain lives in [`agentdesk_core`]; this crate adds the HTTP surface.

pub mod web;

pub use agentdesk_core::{agents, api, config, contacts, distribution, store};
