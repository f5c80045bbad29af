//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Methods
//! take `impl PgExecutor<'_>` as the first argument so they run equally
//! against the shared pool or inside a transaction opened by the mutation
//! façade (mutations and their audit entries must commit together).

pub mod assignment_repo;
pub mod audit_repo;
pub mod lock_repo;
pub mod resource_repo;
pub mod version_repo;

pub use assignment_repo::AssignmentRepo;
pub use audit_repo::AuditRepo;
pub use lock_repo::LockRepo;
pub use resource_repo::ResourceRepo;
pub use version_repo::VersionRepo;
