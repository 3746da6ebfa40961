use serde::{Deserialize, Serialize};

use super::{Gender, JobKind, LanguageId, UserId};

// ── Translator profile ───────────────────────────────────────

/// Directory record for one translator. Owned by the user directory;
/// read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorProfile {
    pub user_id: UserId,
    /// Push recipients are addressed by email, compared case-insensitively.
    pub email: String,
    pub kind: TranslatorKind,
    pub gender: Option<Gender>,
    /// Certification level, matched against job requirements by the store.
    pub level: Option<String>,
    /// Languages the translator works in.
    pub languages: Vec<LanguageId>,
    /// Suspended translators never receive dispatches.
    pub active: bool,
    #[serde(default)]
    pub prefs: NotificationPrefs,
}

/// Which pool a translator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorKind {
    Professional,
    RwsTranslator,
    Volunteer,
}

impl TranslatorKind {
    /// The one job kind this pool is shown. The mapping is closed: adding a
    /// translator kind without deciding its pool is a compile error.
    pub fn job_kind(&self) -> JobKind {
        match self {
            TranslatorKind::Professional => JobKind::Paid,
            TranslatorKind::RwsTranslator => JobKind::Rws,
            TranslatorKind::Volunteer => JobKind::Unpaid,
        }
    }
}

// ── Notification preferences ─────────────────────────────────

/// Per-user push opt-outs, kept on the profile so one directory read covers
/// every check the dispatcher makes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NotificationPrefs {
    /// Opted out of push notifications entirely.
    #[serde(default)]
    pub not_get_notification: bool,
    /// Opted out of pushes about immediate (emergency) bookings.
    #[serde(default)]
    pub not_get_emergency: bool,
    /// Does not want pushes during the night window; those are held until
    /// the next business instant instead.
    #[serde(default)]
    pub not_get_nighttime: bool,
}

// ── Tests ────────────────────────────────────────────────────
