//! Token issuance and verification for all three principal kinds.
//!
//! Tokens are HS256 JWTs. Each kind signs with its own secret, so a token
//! minted for one kind fails signature verification under another even
//! before the embedded kind claim is checked. Verification is pure: no
//! server-side session state.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::config::Config;

const DAY_SECONDS: u64 = 24 * 60 * 60;

/// The three independent principal kinds. Kind determines the cookie, the
/// signing secret, the token lifetime, and the SameSite policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    SiteAdmin,
    HrAdmin,
    Candidate,
}

impl PrincipalKind {
    pub fn cookie_name(self) -> &'static str {
        match self {
            PrincipalKind::SiteAdmin => "admin_token",
            PrincipalKind::HrAdmin => "hr_token",
            PrincipalKind::Candidate => "candidate_token",
        }
    }

    pub fn ttl_seconds(self) -> u64 {
        match self {
            PrincipalKind::SiteAdmin | PrincipalKind::HrAdmin => DAY_SECONDS,
            PrincipalKind::Candidate => 7 * DAY_SECONDS,
        }
    }

    /// The site-admin cookie is Strict: it only gates content writes on the
    /// same origin. The careers cookies stay Lax so login survives normal
    /// navigation.
    pub fn same_site(self) -> &'static str {
        match self {
            PrincipalKind::SiteAdmin => "Strict",
            PrincipalKind::HrAdmin | PrincipalKind::Candidate => "Lax",
        }
    }
}

/// An authenticated actor. The site admin is a fixed shared identity and
/// carries no database id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    pub id: Option<Uuid>,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip)]
    pub kind: PrincipalKind,
}

impl Principal {
    pub fn site_admin(username: &str) -> Self {
        Principal {
            id: None,
            email: username.to_string(),
            name: None,
            kind: PrincipalKind::SiteAdmin,
        }
    }

    pub fn hr_admin(id: Uuid, email: String, name: Option<String>) -> Self {
        Principal {
            id: Some(id),
            email,
            name,
            kind: PrincipalKind::HrAdmin,
        }
    }

    pub fn candidate(id: Uuid, email: String, name: Option<String>) -> Self {
        Principal {
            id: Some(id),
            email,
            name,
            kind: PrincipalKind::Candidate,
        }
    }

    /// The database id, for handlers that already verified a DB-backed kind.
    pub fn db_id(&self) -> Uuid {
        self.id.expect("principal kind carries a database id")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: Option<Uuid>,
    email: String,
    name: Option<String>,
    kind: PrincipalKind,
    iat: u64,
    exp: u64,
}

/// Signing secrets for the three kinds, held once in app state.
#[derive(Clone)]
pub struct TokenKeyring {
    site_admin_secret: String,
    hr_secret: String,
    candidate_secret: String,
}

impl TokenKeyring {
    pub fn from_config(config: &Config) -> Self {
        TokenKeyring {
            site_admin_secret: config.admin_token_secret.clone(),
            hr_secret: config.hr_token_secret.clone(),
            candidate_secret: config.candidate_token_secret.clone(),
        }
    }

    fn secret_for(&self, kind: PrincipalKind) -> &[u8] {
        match kind {
            PrincipalKind::SiteAdmin => self.site_admin_secret.as_bytes(),
            PrincipalKind::HrAdmin => self.hr_secret.as_bytes(),
            PrincipalKind::Candidate => self.candidate_secret.as_bytes(),
        }
    }

    /// Signs a bearer token for the principal; the lifetime follows the
    /// principal's kind.
    pub fn issue(&self, principal: &Principal) -> Result<String, jsonwebtoken::errors::Error> {
        let now = unix_now();
        self.issue_at(principal, now, now + principal.kind.ttl_seconds())
    }

    fn issue_at(
        &self,
        principal: &Principal,
        iat: u64,
        exp: u64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            id: principal.id,
            email: principal.email.clone(),
            name: principal.name.clone(),
            kind: principal.kind,
            iat,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_for(principal.kind)),
        )
    }

    /// Verifies signature, expiry, and kind. Callers cannot tell which check
    /// failed; every failure is `None`.
    pub fn verify(&self, token: &str, expected: PrincipalKind) -> Option<Principal> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_for(expected)),
            &Validation::default(),
        )
        .ok()?;

        if data.claims.kind != expected {
            return None;
        }

        Some(Principal {
            id: data.claims.id,
            email: data.claims.email,
            name: data.claims.name,
            kind: data.claims.kind,
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
