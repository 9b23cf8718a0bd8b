//! The credential store: hashed credentials for HR admins and candidates in
//! Postgres, plus the config-held site-admin identity.
//!
//! Every validate function returns `Ok(None)` for both unknown-account and
//! wrong-password so login handlers cannot leak which one occurred.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::verify_password;
use crate::auth::token::Principal;
use crate::config::Config;
use crate::errors::{conflict_on_unique, AppError};
use crate::models::candidate::{CandidateRow, HrAdminRow};

pub async fn find_hr_admin_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<HrAdminRow>, AppError> {
    Ok(
        sqlx::query_as::<_, HrAdminRow>("SELECT * FROM hr_admins WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn find_candidate_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CandidateRow>, AppError> {
    Ok(
        sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn find_candidate_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<CandidateRow>, AppError> {
    Ok(
        sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Creates a candidate account. A duplicate email surfaces as `Conflict`
/// with a deliberately generic message.
pub async fn create_candidate(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    name: Option<&str>,
) -> Result<CandidateRow, AppError> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        INSERT INTO candidates (email, password_hash, name)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "Email already registered"))
}

/// Checks the fixed site-admin credentials held in configuration.
pub fn validate_site_admin(
    config: &Config,
    username: &str,
    password: &str,
) -> Result<Option<Principal>, AppError> {
    if username != config.admin_username {
        return Ok(None);
    }
    if !verify_password(password, &config.admin_password_hash)? {
        return Ok(None);
    }
    Ok(Some(Principal::site_admin(&config.admin_username)))
}

pub async fn validate_hr_credentials(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<Principal>, AppError> {
    let Some(admin) = find_hr_admin_by_email(pool, email).await? else {
        return Ok(None);
    };
    if !verify_password(password, &admin.password_hash)? {
        return Ok(None);
    }
    Ok(Some(Principal::hr_admin(admin.id, admin.email, admin.name)))
}

pub async fn validate_candidate_credentials(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<Principal>, AppError> {
    let Some(candidate) = find_candidate_by_email(pool, email).await? else {
        return Ok(None);
    };
    if !verify_password(password, &candidate.password_hash)? {
        return Ok(None);
    }
    Ok(Some(Principal::candidate(
        candidate.id,
        candidate.email,
        candidate.name,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::auth::token::PrincipalKind;

    fn test_config(username: &str, password: &str) -> Config {
        Config {
            database_url: String::new(),
            content_path: String::new(),
            s3_bucket: String::new(),
            s3_endpoint: String::new(),
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            anthropic_api_key: String::new(),
            admin_username: username.to_string(),
            admin_password_hash: hash_password(password).unwrap(),
            admin_token_secret: String::new(),
            hr_token_secret: String::new(),
            candidate_token_secret: String::new(),
            secure_cookies: false,
            port: 0,
            rust_log: String::new(),
        }
    }

    #[test]
    fn test_site_admin_valid_credentials() {
        let config = test_config("admin", "correct-password");
        let principal = validate_site_admin(&config, "admin", "correct-password")
            .unwrap()
            .unwrap();

        assert_eq!(principal.kind, PrincipalKind::SiteAdmin);
        assert_eq!(principal.id, None);
        assert_eq!(principal.email, "admin");
    }

    #[test]
    fn test_site_admin_rejections_are_uniform() {
        let config = test_config("admin", "correct-password");

        // Wrong username and wrong password produce the same None.
        assert!(validate_site_admin(&config, "root", "correct-password")
            .unwrap()
            .is_none());
        assert!(validate_site_admin(&config, "admin", "wrong-password")
            .unwrap()
            .is_none());
    }
}
