//! Candidate referral codes. A candidate holds at most one code; a code is
//! created PENDING and completed at most once, when a new application
//! redeems it.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::authenticate;
use crate::auth::token::PrincipalKind;
use crate::errors::AppError;
use crate::models::careers::ReferralRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReferralsResponse {
    pub referral_code: Option<String>,
    pub referrals: Vec<ReferralRow>,
}

#[derive(Debug, Serialize)]
pub struct ReferralCodeResponse {
    pub code: String,
}

/// Builds a referral code: `REF-` plus eight uppercase hex characters.
fn new_referral_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("REF-{}", id[..8].to_uppercase())
}

/// Marks a PENDING referral with this code COMPLETED. Returns whether a row
/// transitioned; a second redemption of the same code matches zero rows.
pub(crate) async fn redeem_referral(pool: &PgPool, code: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE referrals
        SET status = 'COMPLETED', completed_at = NOW()
        WHERE code = $1 AND status = 'PENDING'
        "#,
    )
    .bind(code)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// GET /api/careers/referrals
pub async fn handle_get_referrals(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReferralsResponse>, AppError> {
    let candidate = authenticate(&state, &headers, PrincipalKind::Candidate)?;

    let referrals = sqlx::query_as::<_, ReferralRow>(
        "SELECT * FROM referrals WHERE referrer_id = $1 ORDER BY created_at DESC",
    )
    .bind(candidate.db_id())
    .fetch_all(&state.db)
    .await?;

    let referral_code = referrals.first().map(|r| r.code.clone());

    Ok(Json(ReferralsResponse {
        referral_code,
        referrals,
    }))
}

/// POST /api/careers/referrals
///
/// Returns the candidate's existing code, or creates one.
pub async fn handle_generate_referral(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReferralCodeResponse>, AppError> {
    let candidate = authenticate(&state, &headers, PrincipalKind::Candidate)?;

    let existing: Option<String> =
        sqlx::query_scalar("SELECT code FROM referrals WHERE referrer_id = $1 LIMIT 1")
            .bind(candidate.db_id())
            .fetch_optional(&state.db)
            .await?;

    if let Some(code) = existing {
        return Ok(Json(ReferralCodeResponse { code }));
    }

    let code = new_referral_code();
    sqlx::query(
        "INSERT INTO referrals (referrer_id, code, status) VALUES ($1, $2, 'PENDING')",
    )
    .bind(candidate.db_id())
    .bind(&code)
    .execute(&state.db)
    .await?;

    tracing::info!("Referral code {code} issued to {}", candidate.email);
    Ok(Json(ReferralCodeResponse { code }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referral_code_shape() {
        let code = new_referral_code();
        assert_eq!(code.len(), 12);
        assert!(code.starts_with("REF-"));
        assert!(code[4..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_referral_codes_are_unique_enough() {
        let a = new_referral_code();
        let b = new_referral_code();
        assert_ne!(a, b);
    }
}
