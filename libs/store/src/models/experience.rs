//! Experience model: one position in a contact's scraped work history

use common::error::DatabaseResult;
use serde::{Deserialize, Serialize};

use super::user::{MAX_TEXT_LEN, bounded, required};

/// Experience entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: i64,
    pub contact_url: String,
    pub company_name: String,
    pub company_logo: String,
    pub company_role: String,
    pub company_location: String,
    pub bulletpoints: String,
    pub company_duration: String,
    pub company_total_duration: String,
}

impl Experience {
    /// Apply a single-field update in memory
    pub fn apply(&mut self, update: ExperienceUpdate) {
        match update {
            ExperienceUpdate::CompanyName(v) => self.company_name = v,
            ExperienceUpdate::CompanyRole(v) => self.company_role = v,
            ExperienceUpdate::CompanyLocation(v) => self.company_location = v,
            ExperienceUpdate::Bulletpoints(v) => self.bulletpoints = v,
            ExperienceUpdate::CompanyDuration(v) => self.company_duration = v,
            ExperienceUpdate::CompanyTotalDuration(v) => self.company_total_duration = v,
        }
    }

    /// Check the write-time rules before touching storage
    pub fn validate(&self) -> DatabaseResult<()> {
        validate_columns(
            &self.contact_url,
            &self.bulletpoints,
            [
                ("company_name", self.company_name.as_str()),
                ("company_logo", self.company_logo.as_str()),
                ("company_role", self.company_role.as_str()),
                ("company_location", self.company_location.as_str()),
                ("company_duration", self.company_duration.as_str()),
                ("company_total_duration", self.company_total_duration.as_str()),
            ],
        )
    }
}

/// New experience creation payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewExperience {
    pub contact_url: String,
    pub company_name: String,
    pub company_logo: String,
    pub company_role: String,
    pub company_location: String,
    pub bulletpoints: String,
    pub company_duration: String,
    pub company_total_duration: String,
}

impl NewExperience {
    /// Check the write-time rules before touching storage
    pub fn validate(&self) -> DatabaseResult<()> {
        validate_columns(
            &self.contact_url,
            &self.bulletpoints,
            [
                ("company_name", self.company_name.as_str()),
                ("company_logo", self.company_logo.as_str()),
                ("company_role", self.company_role.as_str()),
                ("company_location", self.company_location.as_str()),
                ("company_duration", self.company_duration.as_str()),
                ("company_total_duration", self.company_total_duration.as_str()),
            ],
        )
    }
}

fn validate_columns<const N: usize>(
    contact_url: &str,
    bulletpoints: &str,
    columns: [(&str, &str); N],
) -> DatabaseResult<()> {
    required("contact_url", contact_url)?;
    for (field, value) in columns {
        required(field, value)?;
        bounded(field, value, MAX_TEXT_LEN)?;
    }
    required("bulletpoints", bulletpoints)
}

/// Single-column experience update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperienceUpdate {
    CompanyName(String),
    CompanyRole(String),
    CompanyLocation(String),
    Bulletpoints(String),
    CompanyDuration(String),
    CompanyTotalDuration(String),
}
