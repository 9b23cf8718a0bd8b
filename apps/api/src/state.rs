use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::auth::token::TokenKeyring;
use crate::config::Config;
use crate::content::store::ContentStore;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Resume blob store (MinIO locally, S3 in production).
    pub s3: S3Client,
    pub llm: LlmClient,
    /// The site content document on disk.
    pub content: ContentStore,
    /// Signing secrets for the three principal kinds.
    pub tokens: TokenKeyring,
    pub config: Config,
}
