//! User model and related functionality

use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use serde::Serialize;

use super::enums::{EmployeeCount, Province, SecurityQuestion, Subscription};

/// Maximum length of bounded text columns
pub const MAX_TEXT_LEN: usize = 255;

/// Maximum length of a phone number
pub const MAX_PHONE_LEN: usize = 20;

/// User entity
///
/// The password hash and the security answer never leave the process: both
/// are skipped when the record is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub number_of_employees: Option<EmployeeCount>,
    pub province: Province,
    pub profile_picture_url: Option<String>,
    pub security_question: SecurityQuestion,
    #[serde(skip_serializing)]
    pub security_answer: String,
    pub status: i64,
    pub my_resume_content: String,
    pub subscription: Subscription,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Apply a single-field update in memory
    pub fn apply(&mut self, update: UserUpdate) {
        match update {
            UserUpdate::Email(v) => self.email = v,
            UserUpdate::FirstName(v) => self.first_name = v,
            UserUpdate::LastName(v) => self.last_name = v,
            UserUpdate::PhoneNumber(v) => self.phone_number = v,
            UserUpdate::Company(v) => self.company = v,
            UserUpdate::NumberOfEmployees(v) => self.number_of_employees = v,
            UserUpdate::Province(v) => self.province = v,
            UserUpdate::ProfilePictureUrl(v) => self.profile_picture_url = v,
            UserUpdate::Status(v) => self.status = v,
            UserUpdate::PasswordHash(v) => self.password_hash = v,
            UserUpdate::ResumeContent(v) => self.my_resume_content = v,
            UserUpdate::Subscription(v) => self.subscription = v,
        }
    }

    /// Check the write-time rules for the mutable columns
    pub fn validate(&self) -> DatabaseResult<()> {
        validate_profile(&UserProfile {
            username: &self.username,
            password_hash: &self.password_hash,
            email: &self.email,
            first_name: &self.first_name,
            last_name: &self.last_name,
            phone_number: self.phone_number.as_deref(),
            company: self.company.as_deref(),
            profile_picture_url: self.profile_picture_url.as_deref(),
            security_answer: &self.security_answer,
        })
    }
}

/// New user creation payload
///
/// `password_hash` must already be a PHC-format hash; plaintext is refused.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub number_of_employees: Option<EmployeeCount>,
    pub province: Province,
    pub profile_picture_url: Option<String>,
    pub security_question: SecurityQuestion,
    pub security_answer: String,
    pub status: i64,
    pub my_resume_content: String,
    pub subscription: Subscription,
}

impl NewUser {
    /// Check the write-time rules before touching storage
    pub fn validate(&self) -> DatabaseResult<()> {
        validate_profile(&UserProfile {
            username: &self.username,
            password_hash: &self.password_hash,
            email: &self.email,
            first_name: &self.first_name,
            last_name: &self.last_name,
            phone_number: self.phone_number.as_deref(),
            company: self.company.as_deref(),
            profile_picture_url: self.profile_picture_url.as_deref(),
            security_answer: &self.security_answer,
        })
    }
}

/// Single-column user update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserUpdate {
    Email(String),
    FirstName(String),
    LastName(String),
    PhoneNumber(Option<String>),
    Company(Option<String>),
    NumberOfEmployees(Option<EmployeeCount>),
    Province(Province),
    ProfilePictureUrl(Option<String>),
    Status(i64),
    PasswordHash(String),
    ResumeContent(String),
    Subscription(Subscription),
}

struct UserProfile<'a> {
    username: &'a str,
    password_hash: &'a str,
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    phone_number: Option<&'a str>,
    company: Option<&'a str>,
    profile_picture_url: Option<&'a str>,
    security_answer: &'a str,
}

fn validate_profile(p: &UserProfile<'_>) -> DatabaseResult<()> {
    required("username", p.username)?;
    required("email", p.email)?;
    required("first_name", p.first_name)?;
    required("last_name", p.last_name)?;
    required("security_answer", p.security_answer)?;

    bounded("username", p.username, MAX_TEXT_LEN)?;
    bounded("email", p.email, MAX_TEXT_LEN)?;
    bounded("first_name", p.first_name, MAX_TEXT_LEN)?;
    bounded("last_name", p.last_name, MAX_TEXT_LEN)?;
    bounded("security_answer", p.security_answer, MAX_TEXT_LEN)?;
    bounded("password_hash", p.password_hash, MAX_TEXT_LEN)?;

    if let Some(phone) = p.phone_number {
        bounded("phone_number", phone, MAX_PHONE_LEN)?;
    }
    if let Some(company) = p.company {
        bounded("company", company, MAX_TEXT_LEN)?;
    }
    if let Some(url) = p.profile_picture_url {
        bounded("profile_picture_url", url, MAX_TEXT_LEN)?;
    }

    // PHC strings always start with `$<algorithm>`
    if !p.password_hash.starts_with('$') {
        return Err(DatabaseError::constraint(
            "password_hash must be a hashed password",
        ));
    }

    Ok(())
}

pub(crate) fn required(field: &str, value: &str) -> DatabaseResult<()> {
    if value.trim().is_empty() {
        return Err(DatabaseError::constraint(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn bounded(field: &str, value: &str, max: usize) -> DatabaseResult<()> {
    if value.chars().count() > max {
        return Err(DatabaseError::constraint(format!(
            "{field} must be at most {max} characters long"
        )));
    }
    Ok(())
}
