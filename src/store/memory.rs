//! Dashmap-backed in-memory collaborators.
//!
//! Used as fixtures by the test suites and for wiring the core up in local
//! development without a database. The job store here mirrors the production
//! query semantics with one approximation: certification-level pairing is
//! left to the real store, so `level` is accepted but not filtered on.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use crate::models::{Gender, Job, JobId, JobKind, LanguageId, TranslatorProfile, UserId};

use super::{JobStore, LanguageCatalog, UserDirectory};

// ── Jobs ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryJobStore {
    jobs: DashMap<JobId, Job>,
    /// (customer, translator) pairs sharing a service town.
    town_links: DashSet<(UserId, UserId)>,
    /// (translator, job) pairs no longer open, e.g. claimed concurrently.
    blocked: DashSet<(UserId, JobId)>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_job(&self, job: Job) {
        self.jobs.insert(job.id, job);
    }

    pub fn remove_job(&self, id: JobId) {
        self.jobs.remove(&id);
    }

    pub fn set_status(&self, id: JobId, status: &str) {
        if let Some(mut job) = self.jobs.get_mut(&id) {
            job.status = status.to_string();
        }
    }

    pub fn link_towns(&self, customer: UserId, translator: UserId) {
        self.town_links.insert((customer, translator));
    }

    /// Mark a booking as no longer assignable to one translator, the way a
    /// concurrent acceptance would.
    pub fn block_assignment(&self, translator: UserId, job: JobId) {
        self.blocked.insert((translator, job));
    }

    fn gender_compatible(job: &Job, translator_gender: Option<Gender>) -> bool {
        match job.gender {
            None => true,
            Some(required) => translator_gender == Some(required),
        }
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn find_job(&self, id: JobId) -> Result<Option<Job>> {
        Ok(self.jobs.get(&id).map(|entry| entry.value().clone()))
    }

    async fn query_pending_jobs(
        &self,
        kind: JobKind,
        languages: &[LanguageId],
        gender: Option<Gender>,
        _level: Option<&str>,
    ) -> Result<Vec<JobId>> {
        let mut ids: Vec<JobId> = self
            .jobs
            .iter()
            .filter(|entry| {
                let job = entry.value();
                job.is_pending()
                    && job.job_type == kind
                    && languages.contains(&job.from_language_id)
                    && Self::gender_compatible(job, gender)
            })
            .map(|entry| *entry.key())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn can_assign(&self, translator: UserId, job: JobId) -> Result<bool> {
        Ok(!self.blocked.contains(&(translator, job)))
    }

    async fn shares_town(&self, owner: UserId, translator: UserId) -> Result<bool> {
        Ok(self.town_links.contains(&(owner, translator)))
    }
}

// ── Users ────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryDirectory {
    translators: DashMap<UserId, TranslatorProfile>,
    customer_categories: DashMap<UserId, String>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_translator(&self, profile: TranslatorProfile) {
        self.translators.insert(profile.user_id, profile);
    }

    pub fn set_customer_category(&self, user: UserId, category: &str) {
        self.customer_categories.insert(user, category.to_string());
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn translator_profile(&self, user: UserId) -> Result<Option<TranslatorProfile>> {
        Ok(self.translators.get(&user).map(|entry| entry.value().clone()))
    }

    async fn active_translators(
        &self,
        excluding: Option<UserId>,
    ) -> Result<Vec<TranslatorProfile>> {
        let mut profiles: Vec<TranslatorProfile> = self
            .translators
            .iter()
            .filter(|entry| entry.active && Some(entry.user_id) != excluding)
            .map(|entry| entry.value().clone())
            .collect();
        // Stable scan order keeps dispatch output deterministic for a given
        // directory state.
        profiles.sort_by_key(|profile| profile.user_id);
        Ok(profiles)
    }

    async fn customer_category(&self, user: UserId) -> Result<Option<String>> {
        Ok(self
            .customer_categories
            .get(&user)
            .map(|entry| entry.value().clone()))
    }
}

// ── Languages ────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryLanguages {
    names: DashMap<LanguageId, String>,
}

impl MemoryLanguages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: LanguageId, name: &str) {
        self.names.insert(id, name.to_string());
    }
}

#[async_trait]
impl LanguageCatalog for MemoryLanguages {
    async fn language_name(&self, id: LanguageId) -> Result<Option<String>> {
        Ok(self.names.get(&id).map(|entry| entry.value().clone()))
    }
}

// ── Tests ────────────────────────────────────────────────────
