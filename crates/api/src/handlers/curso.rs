//! Handlers for the `/cursos` resource.
//!
//! Each handler is generic over the [`GatePolicy`] guarding it, so the V1
//! and V2 route trees share one implementation and differ only in gates.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cursos_core::error::CoreError;
use cursos_core::scope::ReviewScope;
use cursos_core::types::DbId;
use cursos_db::models::avaliacao::Avaliacao;
use cursos_db::models::curso::{CreateCurso, Curso, UpdateCurso};
use cursos_db::repositories::{AvaliacaoRepo, CursoRepo};
use cursos_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{CourseId, ValidatedJson};
use crate::middleware::gate::{Authorized, GatePolicy};
use crate::pagination::Paginator;
use crate::response::Listing;
use crate::state::AppState;

/// Reviews per page for the course `avaliacoes` action.
pub const REVIEWS_ACTION_PAGE_SIZE: i64 = 2;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Curso", id })
}

/// POST /cursos
pub async fn create<P: GatePolicy>(
    State(state): State<AppState>,
    auth: Authorized<P>,
    ValidatedJson(input): ValidatedJson<CreateCurso>,
) -> AppResult<(StatusCode, Json<Curso>)> {
    let curso = CursoRepo::create(&state.pool, &input).await?;
    tracing::info!(
        curso_id = curso.id,
        user_id = ?auth.principal.as_ref().map(|p| p.user_id),
        "Curso created",
    );
    Ok((StatusCode::CREATED, Json(curso)))
}

/// GET /cursos
pub async fn list<P: GatePolicy>(
    State(state): State<AppState>,
    _auth: Authorized<P>,
    paginator: Paginator,
) -> AppResult<Json<Listing<Curso>>> {
    let pool = &state.pool;
    let listing = paginator
        .paginate(CursoRepo::count(pool), |limit, offset| {
            CursoRepo::list(pool, limit, offset)
        })
        .await?;
    Ok(Json(listing))
}

/// GET /cursos/{id}
pub async fn get_by_id<P: GatePolicy>(
    State(state): State<AppState>,
    _auth: Authorized<P>,
    CourseId(id): CourseId,
) -> AppResult<Json<Curso>> {
    let curso = CursoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(curso))
}

async fn apply_update(pool: &DbPool, id: DbId, input: &UpdateCurso) -> AppResult<Json<Curso>> {
    let curso = CursoRepo::update(pool, id, input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(curso))
}

/// PUT /cursos/{id}
///
/// Full replacement: `titulo` and `url` are required.
pub async fn replace<P: GatePolicy>(
    State(state): State<AppState>,
    _auth: Authorized<P>,
    CourseId(id): CourseId,
    ValidatedJson(input): ValidatedJson<UpdateCurso>,
) -> AppResult<Json<Curso>> {
    input.ensure_complete()?;
    apply_update(&state.pool, id, &input).await
}

/// PATCH /cursos/{id}
///
/// Omitted fields keep their stored values.
pub async fn update<P: GatePolicy>(
    State(state): State<AppState>,
    _auth: Authorized<P>,
    CourseId(id): CourseId,
    ValidatedJson(input): ValidatedJson<UpdateCurso>,
) -> AppResult<Json<Curso>> {
    apply_update(&state.pool, id, &input).await
}

/// DELETE /cursos/{id}
///
/// The course's reviews are removed with it.
pub async fn delete<P: GatePolicy>(
    State(state): State<AppState>,
    auth: Authorized<P>,
    CourseId(id): CourseId,
) -> AppResult<StatusCode> {
    if !CursoRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(
        curso_id = id,
        user_id = ?auth.principal.as_ref().map(|p| p.user_id),
        "Curso deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /cursos/{id}/avaliacoes
///
/// The course's reviews, always paginated in pages of
/// [`REVIEWS_ACTION_PAGE_SIZE`] regardless of the server-wide page size.
pub async fn reviews<P: GatePolicy>(
    State(state): State<AppState>,
    _auth: Authorized<P>,
    CourseId(id): CourseId,
    paginator: Paginator,
) -> AppResult<Json<Listing<Avaliacao>>> {
    let pool = &state.pool;
    let scope = ReviewScope::course(id);
    let listing = paginator
        .with_page_size(REVIEWS_ACTION_PAGE_SIZE)
        .paginate(AvaliacaoRepo::count(pool, scope), |limit, offset| {
            AvaliacaoRepo::list(pool, scope, limit, offset)
        })
        .await?;
    Ok(Json(listing))
}
