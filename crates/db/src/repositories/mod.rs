//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod avaliacao_repo;
pub mod curso_repo;

pub use avaliacao_repo::AvaliacaoRepo;
pub use curso_repo::CursoRepo;
