//! HTTP request handlers grouped by resource.

pub mod accounts;
pub mod assignments;
pub mod audit;
pub mod resources;
