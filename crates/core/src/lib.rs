//! Domain rules shared by the database and HTTP layers.
//!
//! Nothing in this crate performs I/O. Permission gates and pagination
//! arithmetic are pure functions over plain values.

pub mod error;
pub mod pagination;
pub mod permissions;
pub mod review;
pub mod scope;
pub mod types;
