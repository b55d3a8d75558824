//! Route definitions for `/api/v1`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{avaliacao, curso};
use crate::middleware::gate::DefaultGates;
use crate::state::AppState;

type G = DefaultGates;

/// Review routes shared by the top-level and course-scoped mounts.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{avaliacao_pk}   -> get_by_id
/// PUT    /{avaliacao_pk}   -> replace
/// PATCH  /{avaliacao_pk}   -> update
/// DELETE /{avaliacao_pk}   -> delete
/// ```
pub fn avaliacoes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(avaliacao::list::<G>).post(avaliacao::create::<G>))
        .route(
            "/{avaliacao_pk}",
            get(avaliacao::get_by_id::<G>)
                .put(avaliacao::replace::<G>)
                .patch(avaliacao::update::<G>)
                .delete(avaliacao::delete::<G>),
        )
}

/// Routes mounted at `/cursos`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> replace
/// PATCH  /{id}      -> update
/// DELETE /{id}      -> delete
///
/// /{curso_pk}/avaliacoes/...  -> review routes scoped to the course
/// ```
pub fn cursos_router() -> Router<AppState> {
    Router::new()
        .route("/", get(curso::list::<G>).post(curso::create::<G>))
        .route(
            "/{id}",
            get(curso::get_by_id::<G>)
                .put(curso::replace::<G>)
                .patch(curso::update::<G>)
                .delete(curso::delete::<G>),
        )
        .nest("/{curso_pk}/avaliacoes", avaliacoes_router())
}
