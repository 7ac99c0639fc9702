//! Contact model and related functionality

use common::error::DatabaseResult;
use serde::{Deserialize, Serialize};

use super::user::{MAX_TEXT_LEN, bounded, required};

/// Contact entity, keyed by the external profile URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub contact_url: String,
    pub name: String,
    pub current_location: String,
    pub headline: String,
    pub about: String,
    pub profile_pic_url: String,
}

impl Contact {
    /// Apply a single-field update in memory
    pub fn apply(&mut self, update: ContactUpdate) {
        match update {
            ContactUpdate::Name(v) => self.name = v,
            ContactUpdate::CurrentLocation(v) => self.current_location = v,
            ContactUpdate::Headline(v) => self.headline = v,
            ContactUpdate::About(v) => self.about = v,
            ContactUpdate::ProfilePicUrl(v) => self.profile_pic_url = v,
        }
    }

    /// Check the write-time rules before touching storage
    pub fn validate(&self) -> DatabaseResult<()> {
        for (field, value) in [
            ("contact_url", &self.contact_url),
            ("name", &self.name),
            ("current_location", &self.current_location),
            ("headline", &self.headline),
            ("profile_pic_url", &self.profile_pic_url),
        ] {
            required(field, value)?;
            bounded(field, value, MAX_TEXT_LEN)?;
        }
        // free text, unbounded
        required("about", &self.about)
    }
}

/// Single-column contact update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactUpdate {
    Name(String),
    CurrentLocation(String),
    Headline(String),
    About(String),
    ProfilePicUrl(String),
}
