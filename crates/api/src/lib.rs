//! Fieldlight admin configuration API server library.
//!
//! Exposes the building blocks (config, state, error handling, façade,
//! routes) so integration tests and the binary entrypoint share the same
//! router and middleware stack.

pub mod auth;
pub mod config;
pub mod error;
pub mod facade;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
