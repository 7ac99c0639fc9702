//! Periodic notifier
//!
//! Once a day, at a fixed local time in a fixed timezone, POST an empty JSON
//! object to the notification endpoint. Runs on its own task and shares
//! nothing with request handling except the HTTP boundary.

pub mod config;
pub mod error;
pub mod notifier;
pub mod schedule;
pub mod trigger;

pub use config::NotifierConfig;
pub use error::{NotifyError, NotifyResult};
pub use notifier::{Notifier, NotifierHandle, NotifierState};
pub use schedule::DailySchedule;
pub use trigger::{Delivery, HttpTrigger, NotificationTrigger};

use chrono::Utc;

/// Build the HTTP-backed notifier described by `config`
pub fn from_config(config: &NotifierConfig) -> NotifyResult<Notifier<HttpTrigger>> {
    let trigger = HttpTrigger::new(&config.url, config.request_timeout)?;
    Ok(Notifier::new(
        DailySchedule::new(config.at, config.timezone)?,
        trigger,
        config.poll_interval,
        Utc::now(),
    ))
}
