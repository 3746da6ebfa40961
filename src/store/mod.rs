//! Read-side collaborator interfaces.
//!
//! The matching and dispatch core issues no writes. Everything it needs from
//! the platform (bookings, translator profiles, the town relation, language
//! names) comes through these traits. Production wires them to the booking
//! database; `memory` provides dashmap-backed implementations for tests and
//! local development.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Gender, Job, JobId, JobKind, LanguageId, TranslatorProfile, UserId};

pub mod memory;

// ── Job store ────────────────────────────────────────────────

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Look up one booking. `None` when it does not (or no longer) exist.
    async fn find_job(&self, id: JobId) -> Result<Option<Job>>;

    /// Pending bookings of `kind` compatible with a translator speaking
    /// `languages`, of the given gender and certification level. Gender and
    /// level pairing are the store's concern; the ids come back unordered.
    async fn query_pending_jobs(
        &self,
        kind: JobKind,
        languages: &[LanguageId],
        gender: Option<Gender>,
        level: Option<&str>,
    ) -> Result<Vec<JobId>>;

    /// Whether this booking is still open to this translator. Re-checked at
    /// dispatch time to cover concurrent acceptance.
    async fn can_assign(&self, translator: UserId, job: JobId) -> Result<bool>;

    /// Whether the booking owner and the translator share a service town.
    async fn shares_town(&self, owner: UserId, translator: UserId) -> Result<bool>;
}

// ── User directory ───────────────────────────────────────────

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Profile for one translator. `None` for unknown users or users
    /// without a translator record.
    async fn translator_profile(&self, user: UserId) -> Result<Option<TranslatorProfile>>;

    /// All active translators, optionally without one user (the translator
    /// who triggered the change and should not be pinged about it).
    async fn active_translators(&self, excluding: Option<UserId>)
        -> Result<Vec<TranslatorProfile>>;

    /// The customer's category ("paid", "law firm", …), carried on the push
    /// payload for the apps.
    async fn customer_category(&self, user: UserId) -> Result<Option<String>>;
}

// ── Language catalog ─────────────────────────────────────────

#[async_trait]
pub trait LanguageCatalog: Send + Sync {
    /// Human-readable name for a language id, e.g. 5 → "franska".
    async fn language_name(&self, id: LanguageId) -> Result<Option<String>>;
}
