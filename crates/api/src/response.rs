//! Shared response types for list endpoints.

use cursos_core::pagination::Page;
use serde::Serialize;

/// A list response: the paginated envelope, or a bare array when
/// pagination is disabled.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Listing<T: Serialize> {
    Page(Page<T>),
    Plain(Vec<T>),
}
