//! Notifier configuration

use std::{env, time::Duration};

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::error::{NotifyError, NotifyResult};

/// Notifier configuration
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Endpoint receiving the daily POST
    pub url: String,
    /// Local wall-clock firing time
    pub at: NaiveTime,
    /// Timezone `at` is expressed in
    pub timezone: Tz,
    /// How often the loop checks the clock
    pub poll_interval: Duration,
    /// Upper bound on one outbound request
    pub request_timeout: Duration,
}

impl NotifierConfig {
    /// Create a new NotifierConfig from environment variables
    ///
    /// # Environment Variables
    /// - `NOTIFIER_URL`: endpoint (default: `http://127.0.0.1:<port>/api/users/notifications`)
    /// - `NOTIFIER_TIME`: `HH:MM` or `HH:MM:SS` (default: `09:00`)
    /// - `NOTIFIER_TIMEZONE`: IANA zone name (default: `US/Eastern`)
    /// - `NOTIFIER_POLL_MILLIS`: clock check interval (default: 500)
    /// - `NOTIFIER_TIMEOUT_SECS`: request timeout (default: 30)
    pub fn from_env(default_port: u16) -> NotifyResult<Self> {
        let url = env::var("NOTIFIER_URL").unwrap_or_else(|_| {
            format!("http://127.0.0.1:{default_port}/api/users/notifications")
        });

        let at = parse_time(&env::var("NOTIFIER_TIME").unwrap_or_else(|_| "09:00".to_string()))?;

        let zone = env::var("NOTIFIER_TIMEZONE").unwrap_or_else(|_| "US/Eastern".to_string());
        let timezone = zone
            .parse::<Tz>()
            .map_err(|e| NotifyError::Configuration(format!("Unknown timezone {zone}: {e}")))?;

        let poll_millis: u64 = env::var("NOTIFIER_POLL_MILLIS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(500);

        // Sub-second polling keeps the firing within the scheduled second
        if poll_millis == 0 || poll_millis >= 1000 {
            return Err(NotifyError::Configuration(
                "NOTIFIER_POLL_MILLIS must be between 1 and 999".to_string(),
            ));
        }

        let timeout_secs = env::var("NOTIFIER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            url,
            at,
            timezone,
            poll_interval: Duration::from_millis(poll_millis),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_time(raw: &str) -> NotifyResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| NotifyError::Configuration(format!("Invalid NOTIFIER_TIME {raw}: {e}")))
}
