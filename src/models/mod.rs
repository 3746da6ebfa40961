pub mod job;
pub mod translator;

pub use job::{Certified, Gender, Immediacy, Job, JobKind, PhoneContact, PhysicalPresence};
pub use translator::{NotificationPrefs, TranslatorKind, TranslatorProfile};

/// Identifier of a booking in the job store.
pub type JobId = i64;
/// Identifier of a user (customer or translator) in the user directory.
pub type UserId = i64;
/// Identifier of a spoken language in the language catalog.
pub type LanguageId = i64;
