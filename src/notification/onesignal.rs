use std::collections::HashSet;
use std::time::Duration;

use anyhow::Context;
use reqwest::header;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PushConfig;
use crate::errors::GatewayError;

use super::composer::LocalizedText;
use super::{DispatchOutcome, NotificationBatch, Recipient};

// ── Recipient Filter ──────────────────────────────────────────

/// One element of the gateway's recipient filter. OneSignal wants a flat
/// array where tag clauses alternate with `{"operator": "OR"}` separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
enum FilterClause {
    Tag {
        key: &'static str,
        relation: &'static str,
        value: String,
    },
    Operator {
        operator: &'static str,
    },
}

/// Build the email filter for a batch: one tag clause per distinct address,
/// lowercased, OR-joined. Duplicate addresses collapse to one clause so the
/// gateway never double-targets a device.
fn email_filter(recipients: &[Recipient]) -> Vec<FilterClause> {
    let mut seen = HashSet::new();
    let mut clauses = Vec::new();

    for recipient in recipients {
        let email = recipient.email.to_lowercase();
        if !seen.insert(email.clone()) {
            continue;
        }
        if !clauses.is_empty() {
            clauses.push(FilterClause::Operator { operator: "OR" });
        }
        clauses.push(FilterClause::Tag {
            key: "email",
            relation: "=",
            value: email,
        });
    }

    clauses
}

// ── Gateway Client ────────────────────────────────────────────

/// Wire shape of a OneSignal create-notification call.
#[derive(Serialize)]
struct PushRequest<'a> {
    app_id: &'a str,
    tags: &'a [FilterClause],
    data: &'a serde_json::Value,
    title: &'a LocalizedText,
    contents: &'a LocalizedText,
    #[serde(rename = "ios_badgeType")]
    ios_badge_type: &'static str,
    #[serde(rename = "ios_badgeCount")]
    ios_badge_count: u32,
    android_sound: &'a str,
    ios_sound: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_after: Option<String>,
}

/// Client for the OneSignal push endpoint. One HTTP call per batch, no
/// automatic retries.
#[derive(Clone)]
pub struct OneSignalClient {
    client: reqwest::Client,
    endpoint: String,
    app_id: String,
    api_key: String,
}

impl OneSignalClient {
    pub fn new(config: &PushConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("failed to build push gateway HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            app_id: config.app_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Submit one batch. Transport errors and gateway rejections are
    /// captured in the outcome, never raised: the caller decides what a
    /// failed batch means for the rest of the dispatch.
    pub async fn send(&self, batch: &NotificationBatch) -> DispatchOutcome {
        let delivery_id = Uuid::new_v4();
        let tags = email_filter(&batch.recipients);
        let request = PushRequest {
            app_id: &self.app_id,
            tags: &tags,
            data: &batch.data,
            title: &batch.title,
            contents: &batch.contents,
            ios_badge_type: "Increase",
            ios_badge_count: 1,
            android_sound: batch.sound.android,
            ios_sound: batch.sound.ios,
            send_after: batch.send_after.map(|at| at.to_rfc3339()),
        };

        debug!(
            delivery_id = %delivery_id,
            recipients = batch.recipients.len(),
            send_after = ?request.send_after,
            "submitting push batch"
        );

        let result = self.submit(&request).await;
        match &result {
            Ok(body) => info!(
                delivery_id = %delivery_id,
                recipients = batch.recipients.len(),
                response = %body,
                "push batch accepted"
            ),
            Err(e) => warn!(
                delivery_id = %delivery_id,
                recipients = batch.recipients.len(),
                error = %e,
                "push batch failed"
            ),
        }

        DispatchOutcome {
            delivery_id,
            recipients: batch.recipients.len(),
            result,
        }
    }

    async fn submit(&self, request: &PushRequest<'_>) -> Result<String, GatewayError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("Basic {}", self.api_key))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

// ── Tests ─────────────────────────────────────────────────────
