//! Web server module
//!
//! Provides the REST API for agent management and contact list
//! distribution, plus an SSE feed of roster changes.

mod api;
pub mod auth;
mod events;
mod server;

pub use server::WebServer;
