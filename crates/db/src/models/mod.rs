//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` row struct and its serialized entity
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches

pub mod avaliacao;
pub mod curso;
