use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Certified, Gender, Immediacy, Job, PhysicalPresence};

// ── Locale & Localized Text ───────────────────────────────────

/// Locales the composer can render. Only one ships today; message text is
/// keyed by locale on the wire so adding another is a template change, not
/// a payload change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
}

impl Locale {
    pub fn key(self) -> &'static str {
        match self {
            Locale::En => "en",
        }
    }
}

/// Message text keyed by locale, serialized the way the gateway expects
/// (`{"en": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new(locale: Locale, text: impl Into<String>) -> Self {
        let mut texts = BTreeMap::new();
        texts.insert(locale.key().to_string(), text.into());
        Self(texts)
    }

    pub fn get(&self, locale: Locale) -> Option<&str> {
        self.0.get(locale.key()).map(String::as_str)
    }
}

// ── Notification Kinds & Sounds ───────────────────────────────

/// Wire identifier telling the mobile app what a push is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    SuitableJob,
    SessionStartRemind,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::SuitableJob => "suitable_job",
            NotificationType::SessionStartRemind => "session_start_remind",
        }
    }
}

/// Android/iOS sound pair attached to a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundProfile {
    pub android: &'static str,
    pub ios: &'static str,
}

impl SoundProfile {
    /// Suitable-job pushes get a booking sound that tells scheduled and
    /// emergency work apart by ear; everything else keeps the device default.
    pub fn for_notification(kind: NotificationType, immediacy: Immediacy) -> Self {
        match (kind, immediacy) {
            (NotificationType::SuitableJob, Immediacy::Scheduled) => Self {
                android: "normal_booking",
                ios: "normal_booking.mp3",
            },
            (NotificationType::SuitableJob, Immediacy::Immediate) => Self {
                android: "emergency_booking",
                ios: "emergency_booking.mp3",
            },
            _ => Self::default(),
        }
    }
}

impl Default for SoundProfile {
    fn default() -> Self {
        Self {
            android: "default",
            ios: "default",
        }
    }
}

// ── Composer ──────────────────────────────────────────────────

/// Context the composer needs but cannot read off the job row itself.
#[derive(Debug, Clone, Default)]
pub struct ComposeExtra {
    /// Human-readable source language name, e.g. "ryska".
    pub language_name: String,
    /// Category of the customer who owns the booking, if known.
    pub customer_category: Option<String>,
}

/// Everything an outbound push carries besides its recipients and the
/// delay decision.
#[derive(Debug, Clone)]
pub struct Composed {
    pub title: LocalizedText,
    pub contents: LocalizedText,
    pub payload: serde_json::Value,
    pub sound: SoundProfile,
}

/// Turns a job plus lookup context into the title, body and structured
/// payload of a push. Pure transform, no I/O.
#[derive(Debug, Clone)]
pub struct Composer {
    title: String,
    locale: Locale,
}

impl Composer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Compose the push announcing a job to eligible translators.
    ///
    /// Scheduled bookings spell out duration and due stamp; immediate ones
    /// only the duration, since they start right away.
    pub fn compose(&self, job: &Job, extra: &ComposeExtra) -> Composed {
        let body = match job.immediate {
            Immediacy::Scheduled => format!(
                "Ny bokning för {}tolk {}min {}",
                extra.language_name,
                job.duration,
                job.due_stamp()
            ),
            Immediacy::Immediate => format!(
                "Ny akutbokning för {}tolk {}min",
                extra.language_name, job.duration
            ),
        };

        let payload = serde_json::json!({
            "job_id": job.id,
            "from_language_id": job.from_language_id,
            "immediate": job.immediate,
            "duration": job.duration,
            "status": job.status.as_str(),
            "gender": job.gender,
            "certified": &job.certified,
            "due": job.due_stamp(),
            "due_date": job.due_date(),
            "due_time": job.due_time(),
            "job_type": job.job_type,
            "customer_phone_type": job.customer_phone_type,
            "customer_physical_type": job.customer_physical_type,
            "customer_town": job.town.as_str(),
            "customer_type": extra.customer_category.as_deref(),
            "language": extra.language_name.as_str(),
            "job_for": job_for_tags(job),
            "notification_type": NotificationType::SuitableJob,
        });

        Composed {
            title: LocalizedText::new(self.locale, &self.title),
            contents: LocalizedText::new(self.locale, body),
            payload,
            sound: SoundProfile::for_notification(NotificationType::SuitableJob, job.immediate),
        }
    }

    /// Compose the reminder pushed to a translator shortly before their
    /// session starts. Physical bookings mention the town, phone bookings
    /// say "(telefon)".
    pub fn compose_session_reminder(&self, job: &Job, language_name: &str) -> Composed {
        let place = match job.customer_physical_type {
            PhysicalPresence::Yes => format!("på plats i {}", job.town),
            PhysicalPresence::No => "telefon".to_string(),
        };
        let body = format!(
            "Detta är en påminnelse om att du har en {}tolkning ({}) kl {} på {} \
             som vara i {} min. Lycka till och kom ihåg att ge feedback efter \
             utförd tolkning!",
            language_name,
            place,
            job.due_time(),
            job.due_date(),
            job.duration
        );

        Composed {
            title: LocalizedText::new(self.locale, &self.title),
            contents: LocalizedText::new(self.locale, body),
            payload: serde_json::json!({
                "job_id": job.id,
                "notification_type": NotificationType::SessionStartRemind,
            }),
            sound: SoundProfile::default(),
        }
    }
}

/// Tag list describing who the booking is for, shown verbatim in the app.
/// Gender first, then certification.
fn job_for_tags(job: &Job) -> Vec<String> {
    let mut tags = Vec::new();

    match job.gender {
        Some(Gender::Male) => tags.push("Man".to_string()),
        Some(Gender::Female) => tags.push("Kvinna".to_string()),
        None => {}
    }

    match &job.certified {
        Some(Certified::Both) => {
            tags.push("certified".to_string());
            tags.push("normal".to_string());
        }
        Some(Certified::Yes) => tags.push("certified".to_string()),
        Some(Certified::Health) => tags.push("Sjukvårdstolk".to_string()),
        Some(Certified::Law) => tags.push("Rättstolk".to_string()),
        Some(Certified::Other(raw)) => tags.push(raw.clone()),
        None => {}
    }

    tags
}

// ── Tests ─────────────────────────────────────────────────────
