use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails with context if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Path to the site content document (a single JSON file).
    pub content_path: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    /// Fixed site-admin identity: username plus an argon2 PHC hash.
    /// The site admin has no database row.
    pub admin_username: String,
    pub admin_password_hash: String,
    /// Token signing secrets, one per principal kind.
    pub admin_token_secret: String,
    pub hr_token_secret: String,
    pub candidate_token_secret: String,
    /// Whether auth cookies carry the `Secure` attribute (on behind TLS).
    pub secure_cookies: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            content_path: std::env::var("CONTENT_PATH")
                .unwrap_or_else(|_| "content/site.json".to_string()),
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            admin_username: require_env("ADMIN_USERNAME")?,
            admin_password_hash: require_env("ADMIN_PASSWORD_HASH")?,
            admin_token_secret: require_secret("ADMIN_TOKEN_SECRET")?,
            hr_token_secret: require_secret("HR_TOKEN_SECRET")?,
            candidate_token_secret: require_secret("CANDIDATE_TOKEN_SECRET")?,
            secure_cookies: std::env::var("SECURE_COOKIES")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Token secrets must additionally be long enough to serve as HMAC keys.
fn require_secret(key: &str) -> Result<String> {
    let value = require_env(key)?;
    if value.len() < 32 {
        bail!("'{key}' must be at least 32 characters");
    }
    Ok(value)
}
