use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Job posting lifecycle. Stored as text; writes validate membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "DRAFT")]
    Draft,
    #[serde(rename = "PUBLISHED")]
    Published,
    #[serde(rename = "CLOSED")]
    Closed,
}

impl JobStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(JobStatus::Draft),
            "PUBLISHED" => Some(JobStatus::Published),
            "CLOSED" => Some(JobStatus::Closed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "DRAFT",
            JobStatus::Published => "PUBLISHED",
            JobStatus::Closed => "CLOSED",
        }
    }
}

/// Application review lifecycle. All transitions are HR-initiated writes;
/// the server validates vocabulary membership only.
/// APPLIED -> SHORTLISTED -> INTERVIEW -> OFFERED -> ACCEPTED, with REJECTED
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "APPLIED")]
    Applied,
    #[serde(rename = "SHORTLISTED")]
    Shortlisted,
    #[serde(rename = "INTERVIEW")]
    Interview,
    #[serde(rename = "OFFERED")]
    Offered,
    #[serde(rename = "ACCEPTED")]
    Accepted,
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl ApplicationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "APPLIED" => Some(ApplicationStatus::Applied),
            "SHORTLISTED" => Some(ApplicationStatus::Shortlisted),
            "INTERVIEW" => Some(ApplicationStatus::Interview),
            "OFFERED" => Some(ApplicationStatus::Offered),
            "ACCEPTED" => Some(ApplicationStatus::Accepted),
            "REJECTED" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::Interview => "INTERVIEW",
            ApplicationStatus::Offered => "OFFERED",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub department: String,
    pub location: String,
    pub employment_type: String,
    pub description: String,
    /// JSON array of requirement strings, nullable.
    pub requirements: Option<Value>,
    pub benefits: Option<Value>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub status: String,
    pub closing_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Job listing line: the row plus its application count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobWithCountRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobRow,
    pub application_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_path: Option<String>,
    pub referral_code: Option<String>,
    pub status: String,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application listing line joined with candidate and job summaries
/// (the HR review queue view).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationSummaryRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub candidate_name: Option<String>,
    pub candidate_email: String,
    pub job_title: String,
    pub job_department: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReferralRow {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub code: String,
    pub status: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_vocabulary() {
        assert_eq!(JobStatus::parse("PUBLISHED"), Some(JobStatus::Published));
        assert_eq!(JobStatus::parse("published"), None);
        assert_eq!(JobStatus::parse("ARCHIVED"), None);
        assert_eq!(JobStatus::Draft.as_str(), "DRAFT");
    }

    #[test]
    fn test_application_status_vocabulary() {
        for status in ["APPLIED", "SHORTLISTED", "INTERVIEW", "OFFERED", "ACCEPTED", "REJECTED"] {
            let parsed = ApplicationStatus::parse(status).unwrap();
            assert_eq!(parsed.as_str(), status);
        }
        assert_eq!(ApplicationStatus::parse("HIRED"), None);
        assert_eq!(ApplicationStatus::parse(""), None);
    }
}
