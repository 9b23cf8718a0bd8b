//! Authentication for the site admin, HR admin, and candidate surfaces.
//!
//! One token module covers all three principal kinds; each kind has its own
//! signing secret, cookie, and lifetime, and a token minted for one kind
//! never verifies as another. Passwords are argon2id PHC strings.

pub mod cookie;
pub mod credentials;
pub mod handlers;
pub mod password;
pub mod token;

use axum::http::HeaderMap;

use crate::errors::AppError;
use crate::state::AppState;
use token::{Principal, PrincipalKind};

/// Reads the kind-scoped cookie and verifies it, or fails with `Unauthorized`.
/// Every failure mode (missing cookie, bad signature, expiry, wrong kind)
/// produces the same error.
pub fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    kind: PrincipalKind,
) -> Result<Principal, AppError> {
    maybe_authenticate(state, headers, kind).ok_or(AppError::Unauthorized)
}

/// Non-failing variant for handlers that widen behavior when a principal is
/// present (e.g. job listings showing drafts to HR).
pub fn maybe_authenticate(
    state: &AppState,
    headers: &HeaderMap,
    kind: PrincipalKind,
) -> Option<Principal> {
    let token = cookie::read_cookie(headers, kind.cookie_name())?;
    state.tokens.verify(&token, kind)
}
