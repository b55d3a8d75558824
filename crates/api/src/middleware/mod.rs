//! Authentication and authorization extractors.
//!
//! - [`auth::MaybeAuthUser`] -- The caller's principal, if a Bearer token was sent.
//! - [`gate::Authorized`] -- Runs a permission gate chain before the handler body.

pub mod auth;
pub mod gate;
