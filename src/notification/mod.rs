//! Push notification pipeline: payload composition, batch partitioning and
//! the outbound gateway call.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::GatewayError;
use crate::models::{JobId, UserId};

pub mod composer;
pub mod dispatch;
pub mod onesignal;

pub use composer::{ComposeExtra, Composed, Composer, Locale, LocalizedText, SoundProfile};
pub use dispatch::Dispatcher;
pub use onesignal::OneSignalClient;

// ── Batches & Outcomes ────────────────────────────────────────

/// One translator addressed by a batch. Recipients are matched on the
/// gateway side by email tag, deduplicated case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: UserId,
    pub email: String,
}

/// One outbound gateway call: a recipient set sharing identical content and
/// one delay decision. Holds each email address once; built per dispatch,
/// never persisted.
#[derive(Debug, Clone)]
pub struct NotificationBatch {
    pub recipients: Vec<Recipient>,
    pub title: LocalizedText,
    pub contents: LocalizedText,
    pub data: serde_json::Value,
    pub sound: SoundProfile,
    /// `None` sends immediately; `Some` asks the gateway to hold delivery
    /// until the given instant.
    pub send_after: Option<DateTime<Utc>>,
}

impl NotificationBatch {
    pub fn new(
        recipients: Vec<Recipient>,
        content: &Composed,
        send_after: Option<DateTime<Utc>>,
    ) -> Self {
        // The gateway targets devices by email tag, so a case-variant
        // duplicate address adds nothing. First profile wins.
        let mut seen = HashSet::new();
        let recipients = recipients
            .into_iter()
            .filter(|r| seen.insert(r.email.to_lowercase()))
            .collect();
        Self {
            recipients,
            title: content.title.clone(),
            contents: content.contents.clone(),
            data: content.payload.clone(),
            sound: content.sound.clone(),
            send_after,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}

/// What happened to one batch. Failures live here, not in a `Result` from
/// the dispatch call: one batch going down must not cancel its sibling.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Correlates log lines with the gateway call that produced them.
    pub delivery_id: Uuid,
    pub recipients: usize,
    /// Raw gateway response body on success, captured error otherwise.
    pub result: Result<String, GatewayError>,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcome of a full dispatch call: up to two batches, either of which is
/// skipped (`None`) when it has no recipients.
#[derive(Debug)]
pub struct DispatchReport {
    pub job_id: JobId,
    pub immediate: Option<DispatchOutcome>,
    pub delayed: Option<DispatchOutcome>,
}

impl DispatchReport {
    /// Report for a dispatch that addressed nobody.
    pub fn empty(job_id: JobId) -> Self {
        Self {
            job_id,
            immediate: None,
            delayed: None,
        }
    }

    /// Total recipients across both batches.
    pub fn recipients(&self) -> usize {
        self.immediate.as_ref().map_or(0, |o| o.recipients)
            + self.delayed.as_ref().map_or(0, |o| o.recipients)
    }

    /// True when every attempted batch was accepted by the gateway. An
    /// empty report is vacuously successful.
    pub fn all_accepted(&self) -> bool {
        self.immediate.as_ref().map_or(true, DispatchOutcome::is_success)
            && self.delayed.as_ref().map_or(true, DispatchOutcome::is_success)
    }
}
