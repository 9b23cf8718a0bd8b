//! Axum route handlers for the three login/verify surfaces.
//!
//! All credential failures are 401 with the same body; verify endpoints
//! answer `{authenticated: false}` rather than describing what was wrong
//! with the token.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::cookie::auth_cookie;
use crate::auth::credentials::{
    create_candidate, find_candidate_by_id, validate_candidate_credentials,
    validate_hr_credentials, validate_site_admin,
};
use crate::auth::maybe_authenticate;
use crate::auth::password::hash_password;
use crate::auth::token::{Principal, PrincipalKind};
use crate::errors::AppError;
use crate::models::candidate::CandidateProfile;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SiteAdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: Principal,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse<U: Serialize> {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<U>,
}

/// Issues the kind-scoped cookie and the login response body.
fn login_response(state: &AppState, principal: Principal) -> Result<impl IntoResponse, AppError> {
    let token = state
        .tokens
        .issue(&principal)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {e}")))?;
    let cookie = auth_cookie(principal.kind, &token, state.config.secure_cookies);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            success: true,
            user: principal,
        }),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Site admin
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/login
pub async fn handle_site_admin_login(
    State(state): State<AppState>,
    Json(request): Json<SiteAdminLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let principal = validate_site_admin(&state.config, &request.username, &request.password)?
        .ok_or(AppError::Unauthorized)?;

    tracing::info!("Site admin logged in");
    login_response(&state, principal)
}

/// GET /api/auth/verify
pub async fn handle_site_admin_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    match maybe_authenticate(&state, &headers, PrincipalKind::SiteAdmin) {
        Some(principal) => (
            StatusCode::OK,
            Json(VerifyResponse {
                authenticated: true,
                user: Some(principal),
            }),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(VerifyResponse {
                authenticated: false,
                user: None,
            }),
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HR admin
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/careers/auth/login
pub async fn handle_hr_login(
    State(state): State<AppState>,
    Json(request): Json<EmailLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let principal = validate_hr_credentials(&state.db, &request.email, &request.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    tracing::info!("HR admin {} logged in", principal.email);
    login_response(&state, principal)
}

/// GET /api/careers/auth/verify
pub async fn handle_hr_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    match maybe_authenticate(&state, &headers, PrincipalKind::HrAdmin) {
        Some(principal) => (
            StatusCode::OK,
            Json(VerifyResponse {
                authenticated: true,
                user: Some(principal),
            }),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(VerifyResponse {
                authenticated: false,
                user: None,
            }),
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/careers/candidate/register
pub async fn handle_candidate_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash_password(&request.password)?;
    let candidate = create_candidate(
        &state.db,
        &request.email,
        &password_hash,
        request.name.as_deref(),
    )
    .await?;

    tracing::info!("Candidate {} registered", candidate.email);
    let principal = Principal::candidate(candidate.id, candidate.email, candidate.name);
    login_response(&state, principal)
}

/// POST /api/careers/candidate/login
pub async fn handle_candidate_login(
    State(state): State<AppState>,
    Json(request): Json<EmailLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let principal = validate_candidate_credentials(&state.db, &request.email, &request.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    login_response(&state, principal)
}

/// GET /api/careers/candidate/verify
///
/// Returns the full stored profile, not just the token claims, so the
/// careers UI can hydrate in one round trip.
pub async fn handle_candidate_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let unauthenticated = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(VerifyResponse::<CandidateProfile> {
                authenticated: false,
                user: None,
            }),
        )
    };

    let Some(principal) = maybe_authenticate(&state, &headers, PrincipalKind::Candidate) else {
        return Ok(unauthenticated());
    };

    // The account may have been deleted since the token was minted.
    let Some(candidate) = find_candidate_by_id(&state.db, principal.db_id()).await? else {
        return Ok(unauthenticated());
    };

    Ok((
        StatusCode::OK,
        Json(VerifyResponse {
            authenticated: true,
            user: Some(CandidateProfile::from(candidate)),
        }),
    ))
}
