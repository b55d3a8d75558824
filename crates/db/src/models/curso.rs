//! Course entity model and DTOs.

use cursos_core::review::round_to_half;
use cursos_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationErrors};

use crate::validation::{http_url, not_blank, require_fields};

/// A course row joined with its review aggregates.
#[derive(Debug, Clone, FromRow)]
pub struct CursoRow {
    pub id: DbId,
    pub titulo: String,
    pub url: String,
    pub criacao: Timestamp,
    pub atualizacao: Timestamp,
    pub ativo: bool,
    /// Ids of the course's reviews, ascending.
    pub avaliacoes: Vec<DbId>,
    /// Unrounded average score; `NULL` when the course has no reviews.
    pub media_bruta: Option<f64>,
}

/// A course as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct Curso {
    pub id: DbId,
    pub titulo: String,
    pub url: String,
    pub criacao: Timestamp,
    pub atualizacao: Timestamp,
    pub ativo: bool,
    pub avaliacoes: Vec<DbId>,
    pub media_avaliacoes: f64,
}

impl From<CursoRow> for Curso {
    fn from(row: CursoRow) -> Self {
        Self {
            id: row.id,
            titulo: row.titulo,
            url: row.url,
            criacao: row.criacao,
            atualizacao: row.atualizacao,
            ativo: row.ativo,
            avaliacoes: row.avaliacoes,
            media_avaliacoes: round_to_half(row.media_bruta),
        }
    }
}

/// DTO for creating a new course.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCurso {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub titulo: String,
    #[validate(
        url(message = "Insira uma URL válida."),
        custom(function = "http_url"),
        length(max = 255)
    )]
    pub url: String,
    /// Defaults to `true` if omitted.
    pub ativo: Option<bool>,
}

/// DTO for updating an existing course. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCurso {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub titulo: Option<String>,
    #[validate(
        url(message = "Insira uma URL válida."),
        custom(function = "http_url"),
        length(max = 255)
    )]
    pub url: Option<String>,
    pub ativo: Option<bool>,
}

impl UpdateCurso {
    /// A full replacement must carry `titulo` and `url`. `ativo` may be
    /// omitted and then keeps its stored value.
    pub fn ensure_complete(&self) -> Result<(), ValidationErrors> {
        require_fields(&[("titulo", self.titulo.is_some()), ("url", self.url.is_some())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(media: Option<f64>) -> CursoRow {
        CursoRow {
            id: 1,
            titulo: "Rust".into(),
            url: "https://example.com/rust".into(),
            criacao: chrono::Utc::now(),
            atualizacao: chrono::Utc::now(),
            ativo: true,
            avaliacoes: vec![3, 5],
            media_bruta: media,
        }
    }

    #[test]
    fn average_is_rounded_on_conversion() {
        let curso = Curso::from(row(Some(4.3)));
        assert_eq!(curso.media_avaliacoes, 4.5);
        assert_eq!(curso.avaliacoes, vec![3, 5]);
    }

    #[test]
    fn course_without_reviews_averages_zero() {
        assert_eq!(Curso::from(row(None)).media_avaliacoes, 0.0);
    }

    #[test]
    fn create_rejects_blank_title_and_bad_url() {
        let input = CreateCurso {
            titulo: "  ".into(),
            url: "not a url".into(),
            ativo: None,
        };
        let errors = input.validate().unwrap_err();
        let fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        assert!(fields.contains(&"titulo".to_string()));
        assert!(fields.contains(&"url".to_string()));
    }

    #[test]
    fn non_web_urls_are_rejected() {
        for url in ["mailto:ana@example.com", "file:///etc/passwd"] {
            let input = CreateCurso {
                titulo: "Rust".into(),
                url: url.into(),
                ativo: None,
            };
            let errors = input.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("url"), "{url}");
        }
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateCurso::default().validate().is_ok());
    }

    #[test]
    fn replacement_needs_title_and_url() {
        let update = UpdateCurso {
            titulo: Some("Only title".into()),
            ..Default::default()
        };
        let errors = update.ensure_complete().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("url"));
        assert!(!fields.contains_key("titulo"));
    }
}
