//! The careers portal: job postings, candidate applications, referrals,
//! resume upload, and AI-assisted job drafting. Conventional CRUD over the
//! record store; the interesting invariants (one application per job and
//! candidate, one referral completion per code) live in the schema and in
//! conditional updates, not in handler logic.

pub mod applications;
pub mod candidates;
pub mod generate;
pub mod jobs;
pub mod referrals;
pub mod upload;
