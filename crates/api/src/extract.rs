//! Request extractors: validated JSON bodies, course ids and scoped review
//! paths.

use std::collections::HashMap;

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use cursos_core::scope::ReviewScope;
use cursos_core::types::DbId;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;
use crate::state::AppState;

/// Path parameter naming the parent course of a nested review route.
const PARENT_PARAM: &str = "curso_pk";

/// Path parameters naming the review itself (V1 and V2 spellings).
const ITEM_PARAMS: &[&str] = &["avaliacao_pk", "pk"];

/// Path parameters naming a course on the course routes (V1 and V2 spellings).
const COURSE_PARAMS: &[&str] = &["id", "pk"];

/// JSON body that is deserialized and then validated.
///
/// Malformed JSON is a `BAD_REQUEST`; rule violations are a
/// `VALIDATION_ERROR` with per-field messages.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Path parameters of the current route, by name.
///
/// Routes without parameters yield an empty map.
async fn path_params(
    parts: &mut Parts,
    state: &AppState,
) -> Result<HashMap<String, String>, AppError> {
    match Path::<HashMap<String, String>>::from_request_parts(parts, state).await {
        Ok(Path(params)) => Ok(params),
        Err(PathRejection::MissingPathParams(_)) => Ok(HashMap::new()),
        Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
    }
}

fn parse_id(params: &HashMap<String, String>, names: &[&str]) -> Result<Option<DbId>, AppError> {
    names
        .iter()
        .find_map(|name| params.get(*name).map(|raw| (*name, raw)))
        .map(|(name, raw)| {
            raw.parse::<DbId>()
                .map_err(|_| AppError::BadRequest(format!("Invalid `{name}`: {raw}")))
        })
        .transpose()
}

/// The course id of a `/cursos/{id}` route.
///
/// A non-numeric id is a JSON `BAD_REQUEST` like every other path error.
#[derive(Debug, Clone, Copy)]
pub struct CourseId(pub DbId);

impl FromRequestParts<AppState> for CourseId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let params = path_params(parts, state).await?;
        parse_id(&params, COURSE_PARAMS)?
            .map(CourseId)
            .ok_or_else(|| AppError::InternalError("course route is missing its id parameter".into()))
    }
}

/// Parent scope of a review collection route.
///
/// `/cursos/{curso_pk}/avaliacoes` is scoped to that course;
/// `/avaliacoes` is unscoped.
#[derive(Debug, Clone, Copy)]
pub struct ScopedCollection(pub ReviewScope);

impl FromRequestParts<AppState> for ScopedCollection {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let params = path_params(parts, state).await?;
        let parent = parse_id(&params, &[PARENT_PARAM])?;
        Ok(ScopedCollection(ReviewScope::from_parent(parent)))
    }
}

/// A review item route: the review id plus its optional parent scope.
#[derive(Debug, Clone, Copy)]
pub struct ScopedItem {
    pub scope: ReviewScope,
    pub id: DbId,
}

impl FromRequestParts<AppState> for ScopedItem {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let params = path_params(parts, state).await?;
        let parent = parse_id(&params, &[PARENT_PARAM])?;
        let id = parse_id(&params, ITEM_PARAMS)?.ok_or_else(|| {
            AppError::InternalError("review route is missing its id parameter".into())
        })?;
        Ok(ScopedItem {
            scope: ReviewScope::from_parent(parent),
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_matching_name_wins() {
        let p = params(&[("pk", "7")]);
        assert_eq!(parse_id(&p, ITEM_PARAMS).unwrap(), Some(7));
        assert_eq!(parse_id(&p, &[PARENT_PARAM]).unwrap(), None);
    }

    #[test]
    fn course_id_reads_either_spelling() {
        assert_eq!(parse_id(&params(&[("id", "3")]), COURSE_PARAMS).unwrap(), Some(3));
        assert_eq!(parse_id(&params(&[("pk", "4")]), COURSE_PARAMS).unwrap(), Some(4));
    }

    #[test]
    fn non_numeric_id_is_bad_request() {
        let p = params(&[("curso_pk", "abc")]);
        assert_matches!(parse_id(&p, &[PARENT_PARAM]), Err(AppError::BadRequest(_)));
    }
}
