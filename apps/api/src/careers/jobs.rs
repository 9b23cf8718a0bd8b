//! Job posting CRUD. Public callers see published jobs only; a valid HR
//! token widens listings to drafts and closed postings.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::token::PrincipalKind;
use crate::auth::{authenticate, maybe_authenticate};
use crate::errors::AppError;
use crate::models::careers::{JobRow, JobStatus, JobWithCountRow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobWithCountRow>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: JobWithCountRow,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub department: String,
    pub location: String,
    pub employment_type: String,
    pub description: String,
    pub requirements: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub status: Option<String>,
    pub closing_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub status: Option<String>,
    pub closing_date: Option<DateTime<Utc>>,
}

const JOB_WITH_COUNT: &str = r#"
    SELECT j.*,
           (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
    FROM jobs j
"#;

/// Validates an incoming status string against the job vocabulary.
fn parse_status(value: &str) -> Result<JobStatus, AppError> {
    JobStatus::parse(value)
        .ok_or_else(|| AppError::Validation(format!("'{value}' is not a valid job status")))
}

/// GET /api/careers/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<JobsResponse>, AppError> {
    let is_hr = maybe_authenticate(&state, &headers, PrincipalKind::HrAdmin).is_some();

    let query = if is_hr {
        format!("{JOB_WITH_COUNT} ORDER BY j.created_at DESC")
    } else {
        format!("{JOB_WITH_COUNT} WHERE j.status = 'PUBLISHED' ORDER BY j.created_at DESC")
    };

    let jobs = sqlx::query_as::<_, JobWithCountRow>(&query)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(JobsResponse { jobs }))
}

/// POST /api/careers/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    authenticate(&state, &headers, PrincipalKind::HrAdmin)?;

    for (field, value) in [
        ("title", &request.title),
        ("department", &request.department),
        ("location", &request.location),
        ("employment_type", &request.employment_type),
        ("description", &request.description),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    let status = match request.status.as_deref() {
        Some(value) => parse_status(value)?,
        None => JobStatus::Draft,
    };

    let job = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (title, department, location, employment_type, description,
             requirements, benefits, min_salary, max_salary, status, closing_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(&request.title)
    .bind(&request.department)
    .bind(&request.location)
    .bind(&request.employment_type)
    .bind(&request.description)
    .bind(request.requirements.as_ref().map(|r| Value::from(r.clone())))
    .bind(request.benefits.as_ref().map(|b| Value::from(b.clone())))
    .bind(request.min_salary)
    .bind(request.max_salary)
    .bind(status.as_str())
    .bind(request.closing_date)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Job '{}' created ({})", job.title, job.id);

    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            job: JobWithCountRow {
                job,
                application_count: 0,
            },
        }),
    ))
}

/// GET /api/careers/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>, AppError> {
    let is_hr = maybe_authenticate(&state, &headers, PrincipalKind::HrAdmin).is_some();

    let job = sqlx::query_as::<_, JobWithCountRow>(&format!("{JOB_WITH_COUNT} WHERE j.id = $1"))
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

    // Unpublished postings do not exist for the public.
    if !is_hr && job.job.status != JobStatus::Published.as_str() {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }

    Ok(Json(JobResponse { job }))
}

/// PUT /api/careers/jobs/:id
///
/// Partial update: absent fields keep their stored value.
pub async fn handle_update_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    authenticate(&state, &headers, PrincipalKind::HrAdmin)?;

    if let Some(status) = request.status.as_deref() {
        parse_status(status)?;
    }

    let job = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs SET
            title = COALESCE($2, title),
            department = COALESCE($3, department),
            location = COALESCE($4, location),
            employment_type = COALESCE($5, employment_type),
            description = COALESCE($6, description),
            requirements = COALESCE($7, requirements),
            benefits = COALESCE($8, benefits),
            min_salary = COALESCE($9, min_salary),
            max_salary = COALESCE($10, max_salary),
            status = COALESCE($11, status),
            closing_date = COALESCE($12, closing_date),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(request.title)
    .bind(request.department)
    .bind(request.location)
    .bind(request.employment_type)
    .bind(request.description)
    .bind(request.requirements.map(Value::from))
    .bind(request.benefits.map(Value::from))
    .bind(request.min_salary)
    .bind(request.max_salary)
    .bind(request.status)
    .bind(request.closing_date)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

    let application_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE job_id = $1")
            .bind(id)
            .fetch_one(&state.db)
            .await?;

    Ok(Json(JobResponse {
        job: JobWithCountRow {
            job,
            application_count,
        },
    }))
}

/// DELETE /api/careers/jobs/:id
///
/// Cascades to the job's applications.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    authenticate(&state, &headers, PrincipalKind::HrAdmin)?;

    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }

    tracing::info!("Job {id} deleted");
    Ok(StatusCode::NO_CONTENT)
}
