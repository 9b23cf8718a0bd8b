pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::careers::{applications, candidates, generate, jobs, referrals, upload};
use crate::content::handlers as content;
use crate::state::AppState;

/// Uploads carry up to 5 MiB of file plus multipart framing.
const BODY_LIMIT_BYTES: usize = 6 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Site content
        .route(
            "/api/content",
            get(content::handle_get_content).put(content::handle_update_content),
        )
        // Site admin session
        .route("/api/auth/login", post(auth::handle_site_admin_login))
        .route("/api/auth/verify", get(auth::handle_site_admin_verify))
        // HR admin session
        .route("/api/careers/auth/login", post(auth::handle_hr_login))
        .route("/api/careers/auth/verify", get(auth::handle_hr_verify))
        // Candidate session + profile
        .route(
            "/api/careers/candidate/register",
            post(auth::handle_candidate_register),
        )
        .route(
            "/api/careers/candidate/login",
            post(auth::handle_candidate_login),
        )
        .route(
            "/api/careers/candidate/verify",
            get(auth::handle_candidate_verify),
        )
        .route(
            "/api/careers/candidate/profile",
            get(candidates::handle_get_profile).put(candidates::handle_update_profile),
        )
        // Jobs
        .route(
            "/api/careers/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/careers/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Applications
        .route(
            "/api/careers/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        .route(
            "/api/careers/applications/:id",
            get(applications::handle_get_application)
                .put(applications::handle_update_application),
        )
        // Referrals
        .route(
            "/api/careers/referrals",
            get(referrals::handle_get_referrals).post(referrals::handle_generate_referral),
        )
        // HR candidate listing
        .route(
            "/api/careers/candidates",
            get(candidates::handle_list_candidates),
        )
        // Resume upload + AI job drafting
        .route("/api/careers/upload", post(upload::handle_upload))
        .route("/api/careers/generate-job", post(generate::handle_generate_job))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
