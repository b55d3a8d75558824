//! HTTP error mapping.
//!
//! Every failure leaves the service as `{"error": <message>, "code": <CODE>}`,
//! plus a `fields` map for validation failures.

use std::collections::BTreeMap;

use axum::http::header::ALLOW;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cursos_core::error::CoreError;
use cursos_db::validation::field_error;
use serde::Serialize;
use validator::ValidationErrors;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error type returned by handlers and extractors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Per-field rule violations in a request body.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Unparseable body or path segment.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The route exists but does not serve this method. `allow` lists the
    /// methods it does serve.
    #[error("Method not allowed")]
    MethodNotAllowed { allow: &'static str },

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    /// Unique violations become field errors on the offending input;
    /// everything else stays a database error.
    fn from(err: sqlx::Error) -> Self {
        match unique_violation(&err) {
            Some(errors) => AppError::Validation(errors),
            None => AppError::Database(err),
        }
    }
}

/// Field errors for a violated `uq_*` constraint, if `err` is one we know.
fn unique_violation(err: &sqlx::Error) -> Option<ValidationErrors> {
    let db_err = err.as_database_error()?;
    if db_err.code().as_deref() != Some("23505") {
        return None;
    }
    match db_err.constraint()? {
        "uq_cursos_url" => Some(field_error(
            "url",
            "unique",
            "curso com este url já existe.".into(),
        )),
        "uq_avaliacoes_email_curso" => Some(field_error(
            "non_field_errors",
            "unique",
            "Os campos email, curso devem criar um set único.".into(),
        )),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::InvalidPage) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", "Invalid page.".into())
            }
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Core(CoreError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Invalid input".into(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::MethodNotAllowed { .. } => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                "Method not allowed".into(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();
        let body = ErrorBody {
            error,
            code,
            fields: match &self {
                AppError::Validation(errors) => Some(field_messages(errors)),
                _ => None,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let AppError::MethodNotAllowed { allow } = self {
            response
                .headers_mut()
                .insert(ALLOW, axum::http::HeaderValue::from_static(allow));
        }
        response
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.into(),
    )
}

/// Flatten validator errors into `{ field: [message, ...] }`.
///
/// Errors without a message fall back to their code.
fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), |m| m.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Map a sqlx error onto a response.
///
/// A missing row is a 404 and a dangling foreign key is a bad request.
/// Anything else, including an unknown unique constraint, is logged and
/// reported as a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::RowNotFound = err {
        return (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".into());
    }

    if let Some(db_err) = err.as_database_error() {
        if db_err.code().as_deref() == Some("23503") {
            return (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Referenced record does not exist".into(),
            );
        }
    }

    tracing::error!(error = %err, "Database error");
    internal()
}
