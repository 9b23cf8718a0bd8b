//! Application intake and HR review.
//!
//! One application per (job, candidate): the unique index enforces it and a
//! violation surfaces as `Conflict`, leaving the original row untouched.
//! Referral redemption is a single conditional update so a code completes
//! at most once no matter how many applications carry it.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::token::PrincipalKind;
use crate::auth::{authenticate, maybe_authenticate};
use crate::errors::{conflict_on_unique, AppError};
use crate::models::candidate::CandidateProfile;
use crate::models::careers::{ApplicationRow, ApplicationStatus, ApplicationSummaryRow, JobRow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationSummaryRow>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub application: ApplicationRow,
}

#[derive(Debug, Serialize)]
pub struct ApplicationDetailResponse {
    pub application: ApplicationRow,
    pub candidate: CandidateProfile,
    pub job: JobRow,
}

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_path: Option<String>,
    pub referral_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub status: Option<String>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

const SUMMARY_SELECT: &str = r#"
    SELECT a.*,
           c.name AS candidate_name,
           c.email AS candidate_email,
           j.title AS job_title,
           j.department AS job_department
    FROM applications a
    JOIN candidates c ON c.id = a.candidate_id
    JOIN jobs j ON j.id = a.job_id
"#;

/// GET /api/careers/applications
///
/// HR sees the whole review queue; a candidate sees their own applications.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApplicationsResponse>, AppError> {
    if maybe_authenticate(&state, &headers, PrincipalKind::HrAdmin).is_some() {
        let applications = sqlx::query_as::<_, ApplicationSummaryRow>(&format!(
            "{SUMMARY_SELECT} ORDER BY a.applied_at DESC"
        ))
        .fetch_all(&state.db)
        .await?;
        return Ok(Json(ApplicationsResponse { applications }));
    }

    let candidate = authenticate(&state, &headers, PrincipalKind::Candidate)?;
    let applications = sqlx::query_as::<_, ApplicationSummaryRow>(&format!(
        "{SUMMARY_SELECT} WHERE a.candidate_id = $1 ORDER BY a.applied_at DESC"
    ))
    .bind(candidate.db_id())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApplicationsResponse { applications }))
}

/// POST /api/careers/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationResponse>), AppError> {
    let candidate = authenticate(&state, &headers, PrincipalKind::Candidate)?;

    // Only published jobs accept applications; anything else does not exist
    // from the candidate's side.
    let job: Option<JobRow> = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(request.job_id)
        .fetch_optional(&state.db)
        .await?;
    let job = match job {
        Some(job) if job.status == "PUBLISHED" => job,
        _ => return Err(AppError::NotFound("Job not found".to_string())),
    };

    let application = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (job_id, candidate_id, cover_letter, resume_path, referral_code)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(job.id)
    .bind(candidate.db_id())
    .bind(request.cover_letter)
    .bind(request.resume_path)
    .bind(request.referral_code.as_deref())
    .fetch_one(&state.db)
    .await
    .map_err(|e| conflict_on_unique(e, "You have already applied for this job"))?;

    if let Some(code) = request.referral_code.as_deref() {
        let completed = crate::careers::referrals::redeem_referral(&state.db, code).await?;
        if completed {
            tracing::info!("Referral code {code} completed");
        }
    }

    tracing::info!(
        "Application {} created for job '{}' by {}",
        application.id,
        job.title,
        candidate.email
    );

    Ok((StatusCode::CREATED, Json(ApplicationResponse { application })))
}

/// GET /api/careers/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetailResponse>, AppError> {
    authenticate(&state, &headers, PrincipalKind::HrAdmin)?;

    let application: ApplicationRow =
        sqlx::query_as("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    let candidate: crate::models::candidate::CandidateRow =
        sqlx::query_as("SELECT * FROM candidates WHERE id = $1")
            .bind(application.candidate_id)
            .fetch_one(&state.db)
            .await?;

    let job: JobRow = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(application.job_id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(ApplicationDetailResponse {
        application,
        candidate: candidate.into(),
        job,
    }))
}

/// PUT /api/careers/applications/:id
///
/// HR review write: status (vocabulary-checked), rating, notes. Partial.
pub async fn handle_update_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    authenticate(&state, &headers, PrincipalKind::HrAdmin)?;

    if let Some(status) = request.status.as_deref() {
        ApplicationStatus::parse(status).ok_or_else(|| {
            AppError::Validation(format!("'{status}' is not a valid application status"))
        })?;
    }

    let application = sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications SET
            status = COALESCE($2, status),
            rating = COALESCE($3, rating),
            notes = COALESCE($4, notes),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(request.status)
    .bind(request.rating)
    .bind(request.notes)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    Ok(Json(ApplicationResponse { application }))
}
