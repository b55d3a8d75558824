//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token validation (and generation for operators and tests).
//!
//! Users and credentials live outside this service; it only trusts tokens
//! signed with the shared secret.

pub mod jwt;
