//! AI-assisted job drafting: an HR admin supplies a title and/or keywords,
//! the LLM returns a draft posting to edit before creating the real job.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::auth::authenticate;
use crate::auth::token::PrincipalKind;
use crate::errors::AppError;
use crate::state::AppState;

const GENERATE_SYSTEM: &str = "You are a recruiting assistant for Curanova AI, \
a healthcare AI company. You draft concise, realistic job postings and \
always answer with bare JSON, no markdown.";

const GENERATE_PROMPT_TEMPLATE: &str = r#"Generate a job posting for Curanova AI as JSON.

Title: {title}
Keywords: {keywords}

Return ONLY this JSON (no markdown):
{
  "title": "Job title",
  "department": "Department name",
  "description": "2 short paragraphs about the role (max 150 words total)",
  "requirements": ["req1", "req2", "req3", "req4", "req5"]
}

Keep the description concise. Include 5 requirements."#;

#[derive(Debug, Deserialize)]
pub struct GenerateJobRequest {
    pub title: Option<String>,
    pub keywords: Option<String>,
}

/// The draft the HR admin edits before creating a job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub department: String,
    pub description: String,
    pub requirements: Vec<String>,
}

fn build_prompt(title: Option<&str>, keywords: Option<&str>) -> String {
    GENERATE_PROMPT_TEMPLATE
        .replace("{title}", title.filter(|t| !t.is_empty()).unwrap_or("Not specified"))
        .replace(
            "{keywords}",
            keywords.filter(|k| !k.is_empty()).unwrap_or("Not specified"),
        )
}

/// POST /api/careers/generate-job
pub async fn handle_generate_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateJobRequest>,
) -> Result<Json<JobDraft>, AppError> {
    authenticate(&state, &headers, PrincipalKind::HrAdmin)?;

    let title = request.title.as_deref().unwrap_or("").trim();
    let keywords = request.keywords.as_deref().unwrap_or("").trim();
    if title.is_empty() && keywords.is_empty() {
        return Err(AppError::Validation(
            "Please provide a title or keywords".to_string(),
        ));
    }

    let prompt = build_prompt(Some(title), Some(keywords));
    let draft: JobDraft = state
        .llm
        .call_json(&prompt, GENERATE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    tracing::info!("Generated job draft '{}'", draft.title);
    Ok(Json(draft))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_substitutes_inputs() {
        let prompt = build_prompt(Some("ML Engineer"), Some("genomics, python"));
        assert!(prompt.contains("Title: ML Engineer"));
        assert!(prompt.contains("Keywords: genomics, python"));
        assert!(!prompt.contains("{title}"));
        assert!(!prompt.contains("{keywords}"));
    }

    #[test]
    fn test_prompt_defaults_missing_inputs() {
        let prompt = build_prompt(Some("ML Engineer"), Some(""));
        assert!(prompt.contains("Keywords: Not specified"));
    }

    #[test]
    fn test_draft_deserializes_from_model_output() {
        let json = r#"{
            "title": "Senior AI Engineer",
            "department": "Engineering",
            "description": "Build clinical models.",
            "requirements": ["5+ years ML", "Python", "Healthcare data", "MS/PhD", "Cloud"]
        }"#;
        let draft: JobDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.department, "Engineering");
        assert_eq!(draft.requirements.len(), 5);
    }
}
