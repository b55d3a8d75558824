//! Route definitions for `/api/v2`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{avaliacao, curso};
use crate::middleware::gate::{CourseGates, DefaultGates};
use crate::state::AppState;

/// Routes mounted at `/cursos`, all behind [`CourseGates`].
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{pk}              -> get_by_id
/// PUT    /{pk}              -> replace
/// PATCH  /{pk}              -> update
/// DELETE /{pk}              -> delete
/// GET    /{pk}/avaliacoes   -> reviews (page size 2)
/// ```
pub fn cursos_router() -> Router<AppState> {
    type G = CourseGates;

    Router::new()
        .route("/", get(curso::list::<G>).post(curso::create::<G>))
        .route(
            "/{pk}",
            get(curso::get_by_id::<G>)
                .put(curso::replace::<G>)
                .patch(curso::update::<G>)
                .delete(curso::delete::<G>),
        )
        .route("/{pk}/avaliacoes", get(curso::reviews::<G>))
}

/// Routes mounted at `/avaliacoes`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{pk}    -> get_by_id
/// PUT    /{pk}    -> replace
/// PATCH  /{pk}    -> update
/// DELETE /{pk}    -> 405
/// ```
pub fn avaliacoes_router() -> Router<AppState> {
    type G = DefaultGates;

    Router::new()
        .route("/", get(avaliacao::list::<G>).post(avaliacao::create::<G>))
        .route(
            "/{pk}",
            get(avaliacao::get_by_id::<G>)
                .put(avaliacao::replace::<G>)
                .patch(avaliacao::update::<G>)
                .delete(avaliacao::reject_delete),
        )
}
