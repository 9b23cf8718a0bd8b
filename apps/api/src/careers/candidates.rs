//! Candidate listing (HR) and the candidate's own profile.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::auth::authenticate;
use crate::auth::credentials::find_candidate_by_id;
use crate::auth::token::PrincipalKind;
use crate::errors::AppError;
use crate::models::candidate::{CandidateProfile, CandidateRow, CandidateSummaryRow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub candidates: Vec<CandidateSummaryRow>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: CandidateProfile,
}

/// Whole-form profile submit: absent fields clear their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
}

/// GET /api/careers/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CandidatesResponse>, AppError> {
    authenticate(&state, &headers, PrincipalKind::HrAdmin)?;

    let candidates = sqlx::query_as::<_, CandidateSummaryRow>(
        r#"
        SELECT c.id, c.email, c.name, c.created_at,
               (SELECT COUNT(*) FROM applications a WHERE a.candidate_id = c.id) AS application_count
        FROM candidates c
        ORDER BY c.created_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(CandidatesResponse { candidates }))
}

/// GET /api/careers/candidate/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, AppError> {
    let principal = authenticate(&state, &headers, PrincipalKind::Candidate)?;

    let candidate = find_candidate_by_id(&state.db, principal.db_id())
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(ProfileResponse {
        user: candidate.into(),
    }))
}

/// PUT /api/careers/candidate/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let principal = authenticate(&state, &headers, PrincipalKind::Candidate)?;

    let candidate = sqlx::query_as::<_, CandidateRow>(
        r#"
        UPDATE candidates SET
            name = $2,
            phone = $3,
            bio = $4,
            linkedin_url = $5,
            portfolio_url = $6,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(principal.db_id())
    .bind(request.name)
    .bind(request.phone)
    .bind(request.bio)
    .bind(request.linkedin_url)
    .bind(request.portfolio_url)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::Unauthorized)?;

    Ok(Json(ProfileResponse {
        user: candidate.into(),
    }))
}
