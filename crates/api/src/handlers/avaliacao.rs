//! Handlers for reviews, both top-level (`/avaliacoes`) and nested under a
//! course (`/cursos/{curso_pk}/avaliacoes`).
//!
//! The route shape decides the [`ReviewScope`]. Under a course path every
//! lookup and write is restricted to that course, so a review belonging to
//! another course is reported as not found.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cursos_core::error::CoreError;
use cursos_core::scope::ReviewScope;
use cursos_core::types::DbId;
use cursos_db::models::avaliacao::{Avaliacao, CreateAvaliacao, UpdateAvaliacao};
use cursos_db::repositories::{AvaliacaoRepo, CursoRepo};
use cursos_db::validation::field_error;
use cursos_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{ScopedCollection, ScopedItem, ValidatedJson};
use crate::middleware::gate::{Authorized, GatePolicy};
use crate::pagination::Paginator;
use crate::response::Listing;
use crate::state::AppState;

/// Methods served by the V2 review item route.
pub const V2_ITEM_ALLOW: &str = "GET, HEAD, PUT, PATCH";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Avaliacao",
        id,
    })
}

/// Ensure a course named in a request body exists.
async fn ensure_curso(pool: &DbPool, curso_id: DbId) -> AppResult<()> {
    if CursoRepo::exists(pool, curso_id).await? {
        Ok(())
    } else {
        Err(field_error(
            "curso",
            "does_not_exist",
            format!("Pk inválido \"{curso_id}\" - objeto não existe."),
        )
        .into())
    }
}

/// Resolve the owning course of a new review.
///
/// A course path wins over the body: a `curso` sent to a nested route is
/// discarded rather than honoured, so a review can only be filed under the
/// course it was posted to. Without a course path, the body must name an
/// existing course.
async fn resolve_parent(
    pool: &DbPool,
    scope: ReviewScope,
    input: &CreateAvaliacao,
) -> AppResult<DbId> {
    if let Some(curso_id) = scope.parent() {
        if !CursoRepo::exists(pool, curso_id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Curso",
                id: curso_id,
            }));
        }
        return Ok(curso_id);
    }

    let curso_id = input.curso.ok_or_else(|| {
        field_error("curso", "required", "Este campo é obrigatório.".to_string())
    })?;
    ensure_curso(pool, curso_id).await?;
    Ok(curso_id)
}

/// POST /avaliacoes, POST /cursos/{curso_pk}/avaliacoes
pub async fn create<P: GatePolicy>(
    State(state): State<AppState>,
    auth: Authorized<P>,
    ScopedCollection(scope): ScopedCollection,
    ValidatedJson(input): ValidatedJson<CreateAvaliacao>,
) -> AppResult<(StatusCode, Json<Avaliacao>)> {
    let curso_id = resolve_parent(&state.pool, scope, &input).await?;
    let review = AvaliacaoRepo::create(&state.pool, curso_id, &input).await?;
    tracing::info!(
        avaliacao_id = review.id,
        curso_id,
        user_id = ?auth.principal.as_ref().map(|p| p.user_id),
        "Avaliacao created",
    );
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /avaliacoes, GET /cursos/{curso_pk}/avaliacoes
pub async fn list<P: GatePolicy>(
    State(state): State<AppState>,
    _auth: Authorized<P>,
    ScopedCollection(scope): ScopedCollection,
    paginator: Paginator,
) -> AppResult<Json<Listing<Avaliacao>>> {
    let pool = &state.pool;
    let listing = paginator
        .paginate(AvaliacaoRepo::count(pool, scope), |limit, offset| {
            AvaliacaoRepo::list(pool, scope, limit, offset)
        })
        .await?;
    Ok(Json(listing))
}

/// GET /avaliacoes/{id}, GET /cursos/{curso_pk}/avaliacoes/{avaliacao_pk}
pub async fn get_by_id<P: GatePolicy>(
    State(state): State<AppState>,
    _auth: Authorized<P>,
    ScopedItem { scope, id }: ScopedItem,
) -> AppResult<Json<Avaliacao>> {
    let review = AvaliacaoRepo::find(&state.pool, scope, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(review))
}

/// Shared body of PUT and PATCH.
///
/// Under a course path the review is pinned to that course and any `curso`
/// in the body is discarded; moving a review is only possible through the
/// top-level route, where the target course must exist.
async fn apply_update(
    pool: &DbPool,
    scope: ReviewScope,
    id: DbId,
    mut input: UpdateAvaliacao,
) -> AppResult<Json<Avaliacao>> {
    if scope.is_nested() {
        input.curso = None;
    } else if let Some(curso_id) = input.curso {
        ensure_curso(pool, curso_id).await?;
    }

    let review = AvaliacaoRepo::update(pool, scope, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(review))
}

/// PUT on a review item.
///
/// Full replacement: `nome`, `email` and `avaliacao` are required, and so is
/// `curso` at the top level.
pub async fn replace<P: GatePolicy>(
    State(state): State<AppState>,
    _auth: Authorized<P>,
    ScopedItem { scope, id }: ScopedItem,
    ValidatedJson(input): ValidatedJson<UpdateAvaliacao>,
) -> AppResult<Json<Avaliacao>> {
    input.ensure_complete(scope.is_nested())?;
    apply_update(&state.pool, scope, id, input).await
}

/// PATCH on a review item. Omitted fields keep their stored values.
pub async fn update<P: GatePolicy>(
    State(state): State<AppState>,
    _auth: Authorized<P>,
    ScopedItem { scope, id }: ScopedItem,
    ValidatedJson(input): ValidatedJson<UpdateAvaliacao>,
) -> AppResult<Json<Avaliacao>> {
    apply_update(&state.pool, scope, id, input).await
}

/// DELETE on a review item.
pub async fn delete<P: GatePolicy>(
    State(state): State<AppState>,
    auth: Authorized<P>,
    ScopedItem { scope, id }: ScopedItem,
) -> AppResult<StatusCode> {
    if !AvaliacaoRepo::delete(&state.pool, scope, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(
        avaliacao_id = id,
        user_id = ?auth.principal.as_ref().map(|p| p.user_id),
        "Avaliacao deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v2/avaliacoes/{pk}
///
/// Reviews cannot be deleted through V2. Rejected before the id is parsed
/// or looked up.
pub async fn reject_delete() -> AppResult<StatusCode> {
    Err(AppError::MethodNotAllowed {
        allow: V2_ITEM_ALLOW,
    })
}
