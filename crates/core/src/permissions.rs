//! Permission gates and their evaluation order.
//!
//! A request is described by the acting [`Principal`] (if any) and the
//! [`Action`] it attempts. Gates are evaluated in order by [`check_all`];
//! the first failing gate rejects the request and later gates never run.
//!
//! A rejection for an anonymous caller is [`CoreError::Unauthorized`]; for an
//! authenticated caller it is [`CoreError::Forbidden`].

use crate::error::CoreError;
use crate::types::DbId;

/// What a request attempts to do to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `GET`, `HEAD`, `OPTIONS`.
    View,
    /// `POST`.
    Add,
    /// `PUT`, `PATCH`.
    Change,
    /// `DELETE`.
    Delete,
}

impl Action {
    /// Safe actions never modify state.
    pub fn is_safe(self) -> bool {
        matches!(self, Action::View)
    }

    /// Permission codename prefix for unsafe actions (`add`, `change`, `delete`).
    pub fn codename_verb(self) -> Option<&'static str> {
        match self {
            Action::View => None,
            Action::Add => Some("add"),
            Action::Change => Some("change"),
            Action::Delete => Some("delete"),
        }
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub username: String,
    pub is_superuser: bool,
    /// Granted permissions as `app.codename` strings, e.g. `cursos.add_curso`.
    pub permissions: Vec<String>,
}

impl Principal {
    /// Superusers hold every permission implicitly.
    pub fn has_perm(&self, perm: &str) -> bool {
        self.is_superuser || self.permissions.iter().any(|p| p == perm)
    }
}

/// A single authorization check.
pub trait PermissionGate: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn check(&self, principal: Option<&Principal>, action: Action) -> Result<(), CoreError>;
}

/// Evaluate `gates` in order, stopping at the first rejection.
pub fn check_all(
    gates: &[&dyn PermissionGate],
    principal: Option<&Principal>,
    action: Action,
) -> Result<(), CoreError> {
    gates
        .iter()
        .try_for_each(|gate| gate.check(principal, action))
}

fn deny(principal: Option<&Principal>, message: &str) -> CoreError {
    match principal {
        None => CoreError::Unauthorized("Authentication credentials were not provided".into()),
        Some(_) => CoreError::Forbidden(message.into()),
    }
}

/// Deleting requires a superuser; every other action passes.
#[derive(Debug, Clone, Copy)]
pub struct SuperuserDelete;

impl PermissionGate for SuperuserDelete {
    fn name(&self) -> &'static str {
        "superuser_delete"
    }

    fn check(&self, principal: Option<&Principal>, action: Action) -> Result<(), CoreError> {
        if action != Action::Delete {
            return Ok(());
        }
        match principal {
            Some(p) if p.is_superuser => Ok(()),
            _ => Err(deny(principal, "Only superusers may delete this resource")),
        }
    }
}

/// Model-level permissions.
///
/// The caller must be authenticated. Safe actions pass; unsafe actions need
/// the `{app}.{verb}_{model}` permission.
#[derive(Debug, Clone, Copy)]
pub struct ModelPermissions {
    pub app: &'static str,
    pub model: &'static str,
}

impl ModelPermissions {
    pub const fn new(app: &'static str, model: &'static str) -> Self {
        Self { app, model }
    }

    /// Permission string required for `action`, if any.
    pub fn required_perm(&self, action: Action) -> Option<String> {
        action
            .codename_verb()
            .map(|verb| format!("{}.{}_{}", self.app, verb, self.model))
    }
}

impl PermissionGate for ModelPermissions {
    fn name(&self) -> &'static str {
        "model_permissions"
    }

    fn check(&self, principal: Option<&Principal>, action: Action) -> Result<(), CoreError> {
        let Some(user) = principal else {
            return Err(deny(None, ""));
        };
        match self.required_perm(action) {
            Some(perm) if !user.has_perm(&perm) => Err(deny(
                principal,
                &format!("Missing permission {perm}"),
            )),
            _ => Ok(()),
        }
    }
}

/// Safe actions are public; anything else needs an authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedOrReadOnly;

impl PermissionGate for AuthenticatedOrReadOnly {
    fn name(&self) -> &'static str {
        "authenticated_or_read_only"
    }

    fn check(&self, principal: Option<&Principal>, action: Action) -> Result<(), CoreError> {
        if action.is_safe() || principal.is_some() {
            Ok(())
        } else {
            Err(deny(None, ""))
        }
    }
}

/// Gates for the V2 course resource, in evaluation order.
pub const COURSE_GATES: &[&dyn PermissionGate] =
    &[&SuperuserDelete, &ModelPermissions::new("cursos", "curso")];

/// Gates for every other endpoint.
pub const DEFAULT_GATES: &[&dyn PermissionGate] = &[&AuthenticatedOrReadOnly];

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn user(perms: &[&str]) -> Principal {
        Principal {
            user_id: 1,
            username: "ana".into(),
            is_superuser: false,
            permissions: perms.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn superuser() -> Principal {
        Principal {
            user_id: 2,
            username: "root".into(),
            is_superuser: true,
            permissions: Vec::new(),
        }
    }

    const MODEL_ONLY: &[&dyn PermissionGate] = &[&ModelPermissions::new("cursos", "curso")];

    #[test]
    fn required_perm_follows_codename_convention() {
        let gate = ModelPermissions::new("cursos", "curso");
        assert_eq!(gate.required_perm(Action::View), None);
        assert_eq!(gate.required_perm(Action::Add).as_deref(), Some("cursos.add_curso"));
        assert_eq!(
            gate.required_perm(Action::Change).as_deref(),
            Some("cursos.change_curso")
        );
        assert_eq!(
            gate.required_perm(Action::Delete).as_deref(),
            Some("cursos.delete_curso")
        );
    }

    #[test]
    fn anonymous_is_unauthorized_on_course_gates() {
        for action in [Action::View, Action::Add, Action::Change, Action::Delete] {
            assert_matches!(
                check_all(COURSE_GATES, None, action),
                Err(CoreError::Unauthorized(_))
            );
        }
    }

    #[test]
    fn authenticated_user_may_view_courses() {
        assert!(check_all(COURSE_GATES, Some(&user(&[])), Action::View).is_ok());
    }

    #[test]
    fn user_without_model_perms_is_forbidden_from_mutations() {
        let plain = user(&[]);
        for action in [Action::Add, Action::Change, Action::Delete] {
            assert_matches!(
                check_all(COURSE_GATES, Some(&plain), action),
                Err(CoreError::Forbidden(_))
            );
        }
    }

    #[test]
    fn model_perms_grant_add_and_change() {
        let editor = user(&["cursos.add_curso", "cursos.change_curso"]);
        assert!(check_all(COURSE_GATES, Some(&editor), Action::Add).is_ok());
        assert!(check_all(COURSE_GATES, Some(&editor), Action::Change).is_ok());
    }

    #[test]
    fn delete_perm_alone_is_stopped_by_superuser_gate() {
        let deleter = user(&["cursos.delete_curso"]);
        let err = check_all(COURSE_GATES, Some(&deleter), Action::Delete).unwrap_err();
        assert_matches!(err, CoreError::Forbidden(msg) if msg.contains("superusers"));
    }

    #[test]
    fn without_superuser_gate_model_perms_govern_delete() {
        let deleter = user(&["cursos.delete_curso"]);
        assert!(check_all(MODEL_ONLY, Some(&deleter), Action::Delete).is_ok());
    }

    #[test]
    fn superuser_passes_every_course_gate() {
        let root = superuser();
        for action in [Action::View, Action::Add, Action::Change, Action::Delete] {
            assert!(check_all(COURSE_GATES, Some(&root), action).is_ok());
        }
    }

    #[test]
    fn default_gates_allow_anonymous_reads_only() {
        assert!(check_all(DEFAULT_GATES, None, Action::View).is_ok());
        assert_matches!(
            check_all(DEFAULT_GATES, None, Action::Add),
            Err(CoreError::Unauthorized(_))
        );
        assert!(check_all(DEFAULT_GATES, Some(&user(&[])), Action::Delete).is_ok());
    }

    #[test]
    fn evaluation_stops_at_first_failure() {
        struct Panicking;
        impl PermissionGate for Panicking {
            fn name(&self) -> &'static str {
                "panicking"
            }
            fn check(&self, _: Option<&Principal>, _: Action) -> Result<(), CoreError> {
                panic!("gate after a rejection must not run");
            }
        }

        let gates: &[&dyn PermissionGate] = &[&SuperuserDelete, &Panicking];
        assert_matches!(
            check_all(gates, Some(&user(&[])), Action::Delete),
            Err(CoreError::Forbidden(_))
        );
    }
}
