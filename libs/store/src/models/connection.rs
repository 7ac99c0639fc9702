//! Connection model: a user's relationship with one contact

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Frequency;

/// Connection entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub id: i64,
    pub user_id: i64,
    pub contact_url: String,
    pub frequency: Frequency,
    pub last_interacted: NaiveDate,
    pub notes: Option<String>,
}

impl Connection {
    /// Date on which the next interaction is expected
    pub fn next_due(&self) -> NaiveDate {
        self.last_interacted + Duration::days(self.frequency.interval_days())
    }

    /// Whether the next interaction is due on or before `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_due() <= today
    }

    /// Apply a single-field update in memory
    pub fn apply(&mut self, update: ConnectionUpdate) {
        match update {
            ConnectionUpdate::Frequency(v) => self.frequency = v,
            ConnectionUpdate::LastInteracted(v) => self.last_interacted = v,
            ConnectionUpdate::Notes(v) => self.notes = v,
        }
    }
}

/// New connection creation payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewConnection {
    pub user_id: i64,
    pub contact_url: String,
    #[serde(default)]
    pub frequency: Frequency,
    /// Defaults to the current UTC date when absent
    #[serde(default)]
    pub last_interacted: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewConnection {
    /// Connection with the default frequency, interacted today
    pub fn new(user_id: i64, contact_url: impl Into<String>) -> Self {
        Self {
            user_id,
            contact_url: contact_url.into(),
            frequency: Frequency::default(),
            last_interacted: None,
            notes: None,
        }
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_last_interacted(mut self, date: NaiveDate) -> Self {
        self.last_interacted = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub(crate) fn last_interacted_or_today(&self) -> NaiveDate {
        self.last_interacted
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Single-column connection update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionUpdate {
    Frequency(Frequency),
    LastInteracted(NaiveDate),
    Notes(Option<String>),
}
