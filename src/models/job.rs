use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{JobId, LanguageId, UserId};

// ── Job ──────────────────────────────────────────────────────

/// A pending interpretation booking, as read from the job store.
///
/// Jobs are created by the booking flow and mutated by the acceptance /
/// cancellation flows; this crate only reads them. `status` is opaque here
/// except for `"pending"`, the only value the matching logic branches on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub from_language_id: LanguageId,
    pub immediate: Immediacy,
    /// Session length in minutes.
    pub duration: u32,
    pub status: String,
    /// Gender the customer asked for, if any.
    pub gender: Option<Gender>,
    /// Certification the customer asked for, if any.
    pub certified: Option<Certified>,
    /// When the session starts. Always a full date + time pair.
    pub due: NaiveDateTime,
    pub job_type: JobKind,
    pub customer_phone_type: PhoneContact,
    pub customer_physical_type: PhysicalPresence,
    /// Town of the owning customer.
    pub town: String,
    /// The customer who owns the booking.
    pub customer_id: UserId,
}

impl Job {
    /// Parse a `"YYYY-MM-DD HH:MM[:SS]"` due stamp.
    pub fn parse_due(raw: &str) -> anyhow::Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
            .with_context(|| format!("invalid due timestamp: {raw}"))
    }

    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }

    pub fn is_immediate(&self) -> bool {
        self.immediate == Immediacy::Immediate
    }

    /// Date half of the due stamp, e.g. `2024-01-10`.
    pub fn due_date(&self) -> String {
        self.due.format("%Y-%m-%d").to_string()
    }

    /// Time half of the due stamp, e.g. `14:00`.
    pub fn due_time(&self) -> String {
        self.due.format("%H:%M").to_string()
    }

    /// Full due stamp as shown to translators.
    pub fn due_stamp(&self) -> String {
        self.due.format("%Y-%m-%d %H:%M").to_string()
    }
}

// ── Wire enums ───────────────────────────────────────────────

/// Urgency of a booking. `Immediate` sessions start right away; `Scheduled`
/// ones have a due stamp in the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Immediacy {
    #[serde(rename = "yes")]
    Immediate,
    #[serde(rename = "no")]
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Payment category of a booking. Each translator pool sees exactly one
/// kind, see `TranslatorKind::job_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Paid,
    Rws,
    Unpaid,
}

/// Whether the customer can take the session over the phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhoneContact {
    #[serde(rename = "yes")]
    Yes,
    #[serde(rename = "no")]
    No,
    /// Legacy bookings carry an empty string here; treated like `No`
    /// by the town exclusion rule.
    #[serde(rename = "")]
    #[default]
    Unspecified,
}

impl PhoneContact {
    pub fn allows_phone(&self) -> bool {
        matches!(self, PhoneContact::Yes)
    }
}

/// Whether the customer requires the translator on site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalPresence {
    Yes,
    No,
}

impl PhysicalPresence {
    pub fn required(&self) -> bool {
        matches!(self, PhysicalPresence::Yes)
    }
}

// ── Certification requirement ────────────────────────────────

/// Certification the customer asked for. The known values map to the
/// recipient tags in `composer::job_for_tags`; anything else is carried
/// through verbatim so old bookings keep round-tripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Certified {
    Yes,
    Both,
    Health,
    Law,
    Other(String),
}

impl Certified {
    pub fn as_str(&self) -> &str {
        match self {
            Certified::Yes => "yes",
            Certified::Both => "both",
            Certified::Health => "n_health",
            Certified::Law => "law",
            Certified::Other(raw) => raw,
        }
    }
}

impl From<&str> for Certified {
    fn from(raw: &str) -> Self {
        match raw {
            "yes" => Certified::Yes,
            "both" => Certified::Both,
            "n_health" | "health" => Certified::Health,
            "law" | "n_law" => Certified::Law,
            other => Certified::Other(other.to_string()),
        }
    }
}

impl Serialize for Certified {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Certified {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Certified::from(raw.as_str()))
    }
}

// ── Tests ────────────────────────────────────────────────────
