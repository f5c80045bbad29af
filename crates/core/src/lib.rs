//! Pure domain logic for the Fieldlight admin configuration service.
//!
//! This crate has no database or HTTP dependencies so the API layer, any
//! future worker, and CLI tooling can all share the same validation rules,
//! audit taxonomy, and resolution logic.

pub mod audit;
pub mod content;
pub mod error;
pub mod hashing;
pub mod locking;
pub mod resolution;
pub mod roles;
pub mod types;
