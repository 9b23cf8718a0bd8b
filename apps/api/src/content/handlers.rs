//! Axum route handlers for the content API.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::authenticate;
use crate::auth::token::PrincipalKind;
use crate::content::store::Document;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    pub page: Option<String>,
    pub data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct UpdateContentResponse {
    pub success: bool,
}

/// GET /api/content
///
/// The whole document, public. The rendering layer reads everything it
/// needs from here in one request.
pub async fn handle_get_content(State(state): State<AppState>) -> Result<Json<Document>, AppError> {
    Ok(Json(state.content.load()?))
}

/// PUT /api/content
///
/// Replaces one page's subtree. Site-admin only; the page must be one of
/// the declared top-level keys.
pub async fn handle_update_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateContentRequest>,
) -> Result<Json<UpdateContentResponse>, AppError> {
    authenticate(&state, &headers, PrincipalKind::SiteAdmin)?;

    let (Some(page), Some(data)) = (request.page, request.data) else {
        return Err(AppError::Validation("Page and data are required".to_string()));
    };

    state.content.replace_page(&page, data)?;
    tracing::info!("Content page '{page}' replaced");

    Ok(Json(UpdateContentResponse { success: true }))
}
