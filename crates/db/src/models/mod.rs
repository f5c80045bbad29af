//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the write paths that need them

pub mod assignment;
pub mod audit;
pub mod lock;
pub mod resource;
pub mod version;
