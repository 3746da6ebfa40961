use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::Config;
use crate::eligibility::EligibilityEngine;
use crate::models::{Job, JobId, LanguageId, UserId};
use crate::quiet_hours::QuietHours;
use crate::store::{JobStore, LanguageCatalog, UserDirectory};

use super::composer::{ComposeExtra, Composer};
use super::onesignal::OneSignalClient;
use super::{DispatchOutcome, DispatchReport, NotificationBatch, Recipient};

/// Coordinates one dispatch: fetches the translator pool, applies opt-outs
/// and eligibility, splits recipients into an immediate and a delayed batch
/// and drives the gateway client. Every notification entry point lives
/// here; resend and admin-cancel reuse the same fan-out.
pub struct Dispatcher {
    jobs: Arc<dyn JobStore>,
    users: Arc<dyn UserDirectory>,
    languages: Arc<dyn LanguageCatalog>,
    clock: Arc<dyn Clock>,
    gateway: OneSignalClient,
    composer: Composer,
    quiet: QuietHours,
    eligibility: EligibilityEngine,
}

impl Dispatcher {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        users: Arc<dyn UserDirectory>,
        languages: Arc<dyn LanguageCatalog>,
        clock: Arc<dyn Clock>,
        gateway: OneSignalClient,
        composer: Composer,
        quiet: QuietHours,
    ) -> Self {
        let eligibility = EligibilityEngine::new(jobs.clone(), users.clone());
        Self {
            jobs,
            users,
            languages,
            clock,
            gateway,
            composer,
            quiet,
            eligibility,
        }
    }

    /// Production wiring: gateway, composer and quiet window all come out
    /// of the loaded configuration.
    pub fn from_config(
        config: &Config,
        jobs: Arc<dyn JobStore>,
        users: Arc<dyn UserDirectory>,
        languages: Arc<dyn LanguageCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let gateway = OneSignalClient::new(&config.push)?;
        let composer = Composer::new(&config.push.title);
        Ok(Self::new(
            jobs,
            users,
            languages,
            clock,
            gateway,
            composer,
            config.quiet_hours(),
        ))
    }

    /// Jobs the given translator is currently eligible for.
    pub async fn potential_jobs_for(&self, user_id: UserId) -> Result<HashSet<JobId>> {
        self.eligibility.potential_jobs_for(user_id).await
    }

    /// Fan a job out to every suitable translator.
    ///
    /// Walks the active pool minus `exclude`, drops opted-out and
    /// ineligible translators, re-checks assignability per candidate, then
    /// partitions the rest: during quiet hours, translators who opted out
    /// of night pushes go into a batch held until the window ends, everyone
    /// else is notified immediately. The two batches are submitted
    /// concurrently and fail independently.
    pub async fn notify_translators_for_job(
        &self,
        job: &Job,
        exclude: Option<UserId>,
    ) -> Result<DispatchReport> {
        let translators = self.users.active_translators(exclude).await?;
        let now = self.clock.now();
        let quiet_now = self.quiet.contains(now);

        let mut immediate = Vec::new();
        let mut delayed = Vec::new();

        for translator in translators {
            if translator.prefs.not_get_notification {
                continue;
            }
            if job.is_immediate() && translator.prefs.not_get_emergency {
                continue;
            }

            let potential = self
                .eligibility
                .potential_jobs_for(translator.user_id)
                .await?;
            if !potential.contains(&job.id) {
                continue;
            }
            // The potential set can go stale the moment it is computed.
            // One more check against the store guards the race with a
            // concurrent acceptance.
            if !self.jobs.can_assign(translator.user_id, job.id).await? {
                continue;
            }

            let recipient = Recipient {
                user_id: translator.user_id,
                email: translator.email,
            };
            if quiet_now && translator.prefs.not_get_nighttime {
                delayed.push(recipient);
            } else {
                immediate.push(recipient);
            }
        }

        if immediate.is_empty() && delayed.is_empty() {
            debug!(job_id = job.id, "no suitable recipients, skipping dispatch");
            return Ok(DispatchReport::empty(job.id));
        }

        let extra = ComposeExtra {
            language_name: self.language_name(job.from_language_id).await?,
            customer_category: self.users.customer_category(job.customer_id).await?,
        };
        let content = self.composer.compose(job, &extra);

        info!(
            job_id = job.id,
            immediate = immediate.len(),
            delayed = delayed.len(),
            quiet_hours = quiet_now,
            "dispatching suitable-job notifications"
        );

        let immediate_batch =
            (!immediate.is_empty()).then(|| NotificationBatch::new(immediate, &content, None));
        let delayed_batch = (!delayed.is_empty()).then(|| {
            NotificationBatch::new(delayed, &content, Some(self.quiet.next_business_instant(now)))
        });

        let (immediate_outcome, delayed_outcome) = tokio::join!(
            self.send_if_present(immediate_batch),
            self.send_if_present(delayed_batch),
        );

        Ok(DispatchReport {
            job_id: job.id,
            immediate: immediate_outcome,
            delayed: delayed_outcome,
        })
    }

    /// Re-broadcast a job to every currently suitable translator. Used by
    /// the manual resend endpoint; a missing job is a logged no-op, not an
    /// error.
    pub async fn resend_notifications(&self, job_id: JobId) -> Result<DispatchReport> {
        match self.jobs.find_job(job_id).await? {
            Some(job) => self.notify_translators_for_job(&job, None).await,
            None => {
                warn!(job_id, "resend requested for unknown job");
                Ok(DispatchReport::empty(job_id))
            }
        }
    }

    /// Notify suitable translators after an admin cancels an assignment and
    /// the booking goes back into the pool. Same fan-out as a fresh job.
    pub async fn notify_admin_cancelled(&self, job_id: JobId) -> Result<DispatchReport> {
        match self.jobs.find_job(job_id).await? {
            Some(job) => {
                info!(job_id, "admin cancellation, renotifying suitable translators");
                self.notify_translators_for_job(&job, None).await
            }
            None => {
                warn!(job_id, "admin cancellation for unknown job");
                Ok(DispatchReport::empty(job_id))
            }
        }
    }

    /// Remind one translator that their booked session starts soon. Honors
    /// the full notification opt-out and the night-time delay preference;
    /// a missing translator or job is a logged no-op.
    pub async fn send_session_start_reminder(
        &self,
        user_id: UserId,
        job_id: JobId,
    ) -> Result<Option<DispatchOutcome>> {
        let Some(translator) = self.users.translator_profile(user_id).await? else {
            debug!(user_id, "session reminder for unknown translator, skipping");
            return Ok(None);
        };
        if translator.prefs.not_get_notification {
            return Ok(None);
        }
        let Some(job) = self.jobs.find_job(job_id).await? else {
            debug!(job_id, "session reminder for unknown job, skipping");
            return Ok(None);
        };

        let language = self.language_name(job.from_language_id).await?;
        let content = self.composer.compose_session_reminder(&job, &language);

        let now = self.clock.now();
        let send_after = (self.quiet.contains(now) && translator.prefs.not_get_nighttime)
            .then(|| self.quiet.next_business_instant(now));

        let batch = NotificationBatch::new(
            vec![Recipient {
                user_id,
                email: translator.email,
            }],
            &content,
            send_after,
        );

        info!(
            user_id,
            job_id,
            delayed = batch.send_after.is_some(),
            "sending session start reminder"
        );
        Ok(Some(self.gateway.send(&batch).await))
    }

    async fn send_if_present(&self, batch: Option<NotificationBatch>) -> Option<DispatchOutcome> {
        match batch {
            Some(batch) => Some(self.gateway.send(&batch).await),
            None => None,
        }
    }

    /// Language display name, falling back to the raw id when the catalog
    /// has no entry. A missing name must not block a dispatch.
    async fn language_name(&self, id: LanguageId) -> Result<String> {
        Ok(match self.languages.language_name(id).await? {
            Some(name) => name,
            None => id.to_string(),
        })
    }
}
