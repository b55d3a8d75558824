//! Permission gate extractors.
//!
//! [`Authorized<P>`] evaluates the gate chain of policy `P` against the
//! request method and caller. Axum runs extractors before the handler body,
//! so a rejected request never reaches the database.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Method;
use cursos_core::permissions::{
    check_all, Action, PermissionGate, Principal, COURSE_GATES, DEFAULT_GATES,
};

use super::auth::MaybeAuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// A named, ordered list of permission gates.
pub trait GatePolicy: Send + Sync + 'static {
    const NAME: &'static str;
    const GATES: &'static [&'static dyn PermissionGate];
}

/// Superuser-only delete, then model permissions on `cursos.curso`.
pub struct CourseGates;

impl GatePolicy for CourseGates {
    const NAME: &'static str = "course";
    const GATES: &'static [&'static dyn PermissionGate] = COURSE_GATES;
}

/// Reads are public, writes need an authenticated caller.
pub struct DefaultGates;

impl GatePolicy for DefaultGates {
    const NAME: &'static str = "default";
    const GATES: &'static [&'static dyn PermissionGate] = DEFAULT_GATES;
}

/// Map an HTTP method onto the action it performs.
///
/// Unknown methods are treated as changes.
pub fn action_for(method: &Method) -> Action {
    match *method {
        Method::GET | Method::HEAD | Method::OPTIONS => Action::View,
        Method::POST => Action::Add,
        Method::DELETE => Action::Delete,
        _ => Action::Change,
    }
}

/// Proof that the request passed every gate of policy `P`.
pub struct Authorized<P> {
    pub principal: Option<Principal>,
    _policy: PhantomData<P>,
}

impl<P: GatePolicy> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(principal) = MaybeAuthUser::from_request_parts(parts, state).await?;
        let action = action_for(&parts.method);

        if let Err(err) = check_all(P::GATES, principal.as_ref(), action) {
            tracing::debug!(
                policy = P::NAME,
                method = %parts.method,
                user_id = ?principal.as_ref().map(|p| p.user_id),
                error = %err,
                "Request rejected by permission gate",
            );
            return Err(err.into());
        }

        Ok(Authorized {
            principal,
            _policy: PhantomData,
        })
    }
}
