use axum::http::Method;

use crate::profiles::model::UserProfile;

/// Read-only methods, exempt from the ownership check.
pub fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Owners may change their own profile and nobody else's.
pub fn may_write(actor: &UserProfile, target: &UserProfile) -> bool {
    target.id == actor.id
}

pub fn may_access(method: &Method, actor: Option<&UserProfile>, target: &UserProfile) -> bool {
    if is_safe(method) {
        return true;
    }
    actor.is_some_and(|actor| may_write(actor, target))
}
