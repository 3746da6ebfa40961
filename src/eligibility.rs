use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::models::{Job, JobId, UserId};
use crate::store::{JobStore, UserDirectory};

// ── Eligibility engine ───────────────────────────────────────

/// Answers "which pending bookings could this translator take?".
///
/// Kind, language, gender and level pairing are pushed down to the job
/// store's query; the engine re-validates every candidate and applies the
/// town exclusion rule on top.
pub struct EligibilityEngine {
    jobs: Arc<dyn JobStore>,
    users: Arc<dyn UserDirectory>,
}

impl EligibilityEngine {
    pub fn new(jobs: Arc<dyn JobStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { jobs, users }
    }

    /// The set of booking ids this translator is currently eligible to hear
    /// about. Unknown users and users without a translator record get an
    /// empty set, not an error.
    pub async fn potential_jobs_for(&self, user: UserId) -> Result<HashSet<JobId>> {
        let Some(profile) = self.users.translator_profile(user).await? else {
            debug!(user_id = user, "no translator profile, potential set is empty");
            return Ok(HashSet::new());
        };

        let kind = profile.kind.job_kind();
        let candidates = self
            .jobs
            .query_pending_jobs(kind, &profile.languages, profile.gender, profile.level.as_deref())
            .await?;

        let mut potential = HashSet::new();
        for id in candidates {
            // Re-read each candidate: a booking can be claimed or withdrawn
            // between the query and this check.
            let Some(job) = self.jobs.find_job(id).await? else {
                continue;
            };
            if !job.is_pending() {
                continue;
            }
            if self.excluded_by_town_rule(&job, user).await? {
                continue;
            }
            potential.insert(job.id);
        }

        debug!(
            user_id = user,
            potential = potential.len(),
            "computed potential booking set"
        );
        Ok(potential)
    }

    /// A translator the customer cannot reach by phone and cannot meet in
    /// person (no shared town) cannot serve an on-site-only booking.
    async fn excluded_by_town_rule(&self, job: &Job, translator: UserId) -> Result<bool> {
        if job.customer_phone_type.allows_phone() {
            return Ok(false);
        }
        if !job.customer_physical_type.required() {
            return Ok(false);
        }
        Ok(!self.jobs.shares_town(job.customer_id, translator).await?)
    }
}

// ── Tests ────────────────────────────────────────────────────
