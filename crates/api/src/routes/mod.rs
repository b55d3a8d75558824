pub mod health;
pub mod v1;
pub mod v2;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Plain resource views. Reads are public, writes need an authenticated
/// caller.
///
/// ```text
/// /cursos                                       list, create
/// /cursos/{id}                                  get, update, delete
/// /cursos/{curso_pk}/avaliacoes                 list, create (scoped)
/// /cursos/{curso_pk}/avaliacoes/{avaliacao_pk}  get, update, delete (scoped)
/// /avaliacoes                                   list, create
/// /avaliacoes/{avaliacao_pk}                    get, update, delete
/// ```
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/cursos", v1::cursos_router())
        .nest("/avaliacoes", v1::avaliacoes_router())
}

/// Build the `/api/v2` route tree.
///
/// Resource sets. Courses run under the course gates; reviews keep the
/// default gates and cannot be deleted.
///
/// ```text
/// /cursos                   list, create
/// /cursos/{pk}              get, update, partial update, delete
/// /cursos/{pk}/avaliacoes   paginated reviews of one course
/// /avaliacoes               list, create
/// /avaliacoes/{pk}          get, update, partial update (DELETE -> 405)
/// ```
pub fn v2_routes() -> Router<AppState> {
    Router::new()
        .nest("/cursos", v2::cursos_router())
        .nest("/avaliacoes", v2::avaliacoes_router())
}
