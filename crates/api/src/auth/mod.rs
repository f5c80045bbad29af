//! JWT access-token handling.
//!
//! Identity lives in an external provider; this service only validates the
//! HS256 tokens it issues. [`jwt::generate_access_token`] exists for local
//! development and integration tests.

pub mod jwt;
