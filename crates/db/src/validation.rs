//! Custom field rules used by the DTO `Validate` derives.

use std::borrow::Cow;

use cursos_core::review::{is_valid_score, SCORE_MESSAGE};
use validator::{ValidationError, ValidationErrors};

/// Reject strings that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("Este campo não pode ser em branco.")));
    }
    Ok(())
}

/// Course links must use the `http` or `https` scheme.
///
/// Paired with the derive's `url` rule, which accepts any scheme.
pub fn http_url(value: &str) -> Result<(), ValidationError> {
    let scheme = value.split_once("://").map(|(scheme, _)| scheme);
    match scheme {
        Some(s) if s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https") => Ok(()),
        _ => Err(ValidationError::new("url_scheme")
            .with_message(Cow::Borrowed("Insira uma URL válida."))),
    }
}

/// Error for a required field missing from the body.
pub fn required() -> ValidationError {
    ValidationError::new("required").with_message(Cow::Borrowed("Este campo é obrigatório."))
}

/// Review scores must be whole numbers between 1 and 5.
pub fn valid_score(score: f64) -> Result<(), ValidationError> {
    if is_valid_score(score) {
        Ok(())
    } else {
        Err(ValidationError::new("score_range").with_message(Cow::Borrowed(SCORE_MESSAGE)))
    }
}

/// A `required` error for every `(field, present)` pair that is absent.
pub fn require_fields(fields: &[(&'static str, bool)]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for &(field, present) in fields {
        if !present {
            errors.add(field, required());
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A single-field error set, for rules checked outside the derive.
pub fn field_error(field: &'static str, code: &'static str, message: String) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, ValidationError::new(code).with_message(Cow::Owned(message)));
    errors
}
