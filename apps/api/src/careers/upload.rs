//! Candidate resume upload.
//!
//! The stored object is opaque to the rest of the system: applications
//! carry the returned path string and nothing ever parses the file.

use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::authenticate;
use crate::auth::token::PrincipalKind;
use crate::errors::AppError;
use crate::state::AppState;

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Rejects anything outside the resume allow-list or over the size ceiling.
fn validate_resume(content_type: &str, size: usize) -> Result<(), AppError> {
    if !ALLOWED_TYPES.contains(&content_type) {
        return Err(AppError::Validation(
            "Invalid file type. Only PDF, DOC, and DOCX are allowed.".to_string(),
        ));
    }
    if size > MAX_RESUME_BYTES {
        return Err(AppError::Validation(
            "File too large. Maximum size is 5MB.".to_string(),
        ));
    }
    Ok(())
}

/// Object-key extension, derived from the declared content type rather than
/// the client-supplied filename.
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "application/pdf" => "pdf",
        "application/msword" => "doc",
        _ => "docx",
    }
}

/// POST /api/careers/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let candidate = authenticate(&state, &headers, PrincipalKind::Candidate)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .ok_or_else(|| AppError::Validation("File content type is required".to_string()))?
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            upload = Some((content_type, data));
            break;
        }
    }

    let Some((content_type, data)) = upload else {
        return Err(AppError::Validation("No file provided".to_string()));
    };

    validate_resume(&content_type, data.len())?;

    let key = format!(
        "resumes/{}-{}.{}",
        candidate.db_id(),
        Uuid::new_v4().simple(),
        extension_for(&content_type)
    );

    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&key)
        .body(ByteStream::from(data))
        .content_type(&content_type)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Resume upload failed: {e}")))?;

    tracing::info!("Resume stored at {key} for {}", candidate.email);

    Ok(Json(UploadResponse {
        url: format!("/{}/{}", state.config.s3_bucket, key),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_types_pass() {
        for ty in ALLOWED_TYPES {
            assert!(validate_resume(ty, 1024).is_ok());
        }
    }

    #[test]
    fn test_disallowed_type_rejected() {
        for ty in ["image/png", "text/html", "application/octet-stream", ""] {
            assert!(validate_resume(ty, 1024).is_err());
        }
    }

    #[test]
    fn test_size_ceiling() {
        assert!(validate_resume("application/pdf", MAX_RESUME_BYTES).is_ok());
        assert!(validate_resume("application/pdf", MAX_RESUME_BYTES + 1).is_err());
    }

    #[test]
    fn test_extension_follows_content_type() {
        assert_eq!(extension_for("application/pdf"), "pdf");
        assert_eq!(extension_for("application/msword"), "doc");
        assert_eq!(
            extension_for(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            "docx"
        );
    }
}
