//! Review entity model and DTOs.

use cursos_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationErrors};

use crate::validation::{not_blank, require_fields, valid_score};

/// A review row from the `avaliacoes` table.
///
/// `email` is write-only: it is stored and compared but never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Avaliacao {
    pub id: DbId,
    #[serde(rename = "curso")]
    pub curso_id: DbId,
    pub nome: String,
    #[serde(skip_serializing)]
    pub email: String,
    pub comentario: String,
    pub avaliacao: f64,
    pub criacao: Timestamp,
    pub atualizacao: Timestamp,
    pub ativo: bool,
}

/// DTO for creating a review.
///
/// `curso` is ignored when the review is created under a course path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAvaliacao {
    pub curso: Option<DbId>,
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub nome: String,
    #[validate(email(message = "Insira um endereço de email válido."), length(max = 254))]
    pub email: String,
    /// Defaults to an empty string.
    pub comentario: Option<String>,
    #[validate(custom(function = "valid_score"))]
    pub avaliacao: f64,
    /// Defaults to `true` if omitted.
    pub ativo: Option<bool>,
}

/// DTO for updating a review. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAvaliacao {
    /// Moves the review to another course; ignored under a course path.
    pub curso: Option<DbId>,
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub nome: Option<String>,
    #[validate(email(message = "Insira um endereço de email válido."), length(max = 254))]
    pub email: Option<String>,
    pub comentario: Option<String>,
    #[validate(custom(function = "valid_score"))]
    pub avaliacao: Option<f64>,
    pub ativo: Option<bool>,
}

impl UpdateAvaliacao {
    /// A full replacement must carry `nome`, `email` and `avaliacao`, plus
    /// `curso` unless the route already names the course.
    pub fn ensure_complete(&self, course_from_path: bool) -> Result<(), ValidationErrors> {
        require_fields(&[
            ("curso", course_from_path || self.curso.is_some()),
            ("nome", self.nome.is_some()),
            ("email", self.email.is_some()),
            ("avaliacao", self.avaliacao.is_some()),
        ])
    }
}
