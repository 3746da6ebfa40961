use std::time::Duration;

use anyhow::Context;
use chrono::NaiveTime;

use crate::quiet_hours::QuietHours;

/// Deployment environment, selecting which OneSignal credential pair is
/// used. Anything other than "prod" counts as dev.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Prod,
    Dev,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Dev => "dev",
        }
    }

    fn from_env() -> Self {
        match std::env::var("APP_ENV").as_deref() {
            Ok("prod") => Environment::Prod,
            _ => Environment::Dev,
        }
    }

    /// Environment variable pair holding this deployment's OneSignal
    /// credentials.
    fn credential_vars(self) -> (&'static str, &'static str) {
        match self {
            Environment::Prod => ("ONESIGNAL_PROD_APP_ID", "ONESIGNAL_PROD_API_KEY"),
            Environment::Dev => ("ONESIGNAL_DEV_APP_ID", "ONESIGNAL_DEV_API_KEY"),
        }
    }
}

/// Push gateway settings.
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// OneSignal create-notification endpoint. Overridable for tests.
    pub endpoint: String,
    pub app_id: String,
    /// REST API key, sent as `Authorization: Basic <key>`.
    pub api_key: String,
    /// Notification title shown on the device.
    pub title: String,
    /// Bound on each outbound gateway call.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub push: PushConfig,
    /// Start of the nightly window during which delay-opted translators
    /// are not pushed immediately.
    pub quiet_start: NaiveTime,
    pub quiet_end: NaiveTime,
}

impl Config {
    pub fn quiet_hours(&self) -> QuietHours {
        QuietHours::new(self.quiet_start, self.quiet_end)
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();
    let (app_id_var, api_key_var) = environment.credential_vars();

    Ok(Config {
        environment,
        push: PushConfig {
            endpoint: std::env::var("ONESIGNAL_ENDPOINT")
                .unwrap_or_else(|_| "https://onesignal.com/api/v1/notifications".into()),
            app_id: required(app_id_var)?,
            api_key: required(api_key_var)?,
            title: std::env::var("PUSH_TITLE").unwrap_or_else(|_| "Tolkportalen".into()),
            timeout: Duration::from_secs(
                std::env::var("PUSH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
        },
        quiet_start: time_from_env("PUSH_QUIET_START", "22:00")?,
        quiet_end: time_from_env("PUSH_QUIET_END", "06:00")?,
    })
}

/// Credentials have no sane default. Missing ones abort startup rather
/// than surfacing as a rejected call later.
fn required(var: &str) -> anyhow::Result<String> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => anyhow::bail!("{} is not set; push dispatch cannot start", var),
    }
}

fn time_from_env(var: &str, default: &str) -> anyhow::Result<NaiveTime> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M")
        .with_context(|| format!("{} must be HH:MM, got '{}'", var, raw))
}
