//! Core library for agentdesk.
//!
//! Holds the agent roster, the contact CSV ingestion pipeline and the
//! round-robin task distributor. Consumers (the web server, tests, tools)
//! go through [`api::DeskCore`] rather than touching the store directly.

pub mod agents;
pub mod api;
pub mod config;
pub mod contacts;
pub mod distribution;
pub mod store;
