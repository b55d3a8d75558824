//! Parent scoping for the review resource.
//!
//! A review is reachable both on its own (`/avaliacoes/{id}`) and nested under
//! its course (`/cursos/{curso_pk}/avaliacoes/{id}`). Both paths go through the
//! same [`ReviewScope`]; the nested path only adds the parent predicate.

use crate::types::DbId;

/// Optional course restriction applied to every review lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewScope {
    curso_id: Option<DbId>,
}

impl ReviewScope {
    /// No parent restriction: every review is visible.
    pub const fn all() -> Self {
        Self { curso_id: None }
    }

    /// Only reviews whose foreign key equals `curso_id`.
    pub const fn course(curso_id: DbId) -> Self {
        Self {
            curso_id: Some(curso_id),
        }
    }

    /// Build a scope from an optional path segment.
    pub const fn from_parent(curso_id: Option<DbId>) -> Self {
        Self { curso_id }
    }

    /// The parent course id, if the scope is restricted.
    pub const fn parent(&self) -> Option<DbId> {
        self.curso_id
    }

    pub const fn is_nested(&self) -> bool {
        self.curso_id.is_some()
    }

    /// Whether a review owned by `curso_id` is visible through this scope.
    pub fn admits(&self, curso_id: DbId) -> bool {
        match self.curso_id {
            Some(parent) => parent == curso_id,
            None => true,
        }
    }
}
