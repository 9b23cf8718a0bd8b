use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// HR admin credential record. Never serialized; the hash stays server-side.
#[derive(Debug, Clone, FromRow)]
pub struct HrAdminRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Candidate account record, including credentials and profile fields.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The candidate-visible view of their own account.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_path: Option<String>,
}

impl From<CandidateRow> for CandidateProfile {
    fn from(row: CandidateRow) -> Self {
        CandidateProfile {
            id: row.id,
            email: row.email,
            name: row.name,
            phone: row.phone,
            bio: row.bio,
            linkedin_url: row.linkedin_url,
            portfolio_url: row.portfolio_url,
            resume_path: row.resume_path,
        }
    }
}

/// One line of the HR candidate listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CandidateSummaryRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub application_count: i64,
}
