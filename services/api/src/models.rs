//! API models for request and response payloads

use serde::{Deserialize, Serialize};
use store::models::{EmployeeCount, NewUser, Province, SecurityQuestion, Subscription, User};

use crate::error::ApiResult;

/// Request for user registration
///
/// Optional text fields sent as empty strings are treated as absent.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(rename = "confirmPassword", default)]
    pub confirm_password: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub number_of_employees: Option<String>,
    pub province: String,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    pub security_question: String,
    pub security_answer: String,
    #[serde(default)]
    pub my_resume_content: String,
    #[serde(default)]
    pub subscription: Option<String>,
}

impl RegisterRequest {
    /// Parse the enumerated fields and attach an already hashed password
    pub fn into_new_user(self, password_hash: String) -> ApiResult<NewUser> {
        let number_of_employees = present(self.number_of_employees)
            .map(|raw| raw.parse::<EmployeeCount>())
            .transpose()?;
        let subscription = match present(self.subscription) {
            Some(raw) => raw.parse::<Subscription>()?,
            None => Subscription::Free,
        };

        Ok(NewUser {
            username: self.username,
            password_hash,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: present(self.phone_number),
            company: present(self.company),
            number_of_employees,
            province: self.province.parse::<Province>()?,
            profile_picture_url: present(self.profile_picture_url),
            security_question: self.security_question.parse::<SecurityQuestion>()?,
            security_answer: self.security_answer,
            status: 0,
            my_resume_content: self.my_resume_content,
            subscription,
        })
    }
}

/// Request for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}

/// Response for a successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub msg: String,
}

pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(extra: serde_json::Value) -> RegisterRequest {
        let mut body = json!({
            "username": "alice",
            "password": "Secur3P@ss",
            "confirmPassword": "Secur3P@ss",
            "email": "a@x.com",
            "first_name": "Alice",
            "last_name": "Liddell",
            "phone_number": "",
            "company": "",
            "number_of_employees": "",
            "province": "Ontario",
            "profile_picture_url": "",
            "security_question": "What city were you born in?",
            "security_answer": "Toronto",
            "my_resume_content": "",
            "subscription": "Free Tier"
        });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                body.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn signup_form_becomes_new_user() {
        let user = request(json!({})).into_new_user("$argon2id$x".to_string()).unwrap();
        assert_eq!(user.province, Province::Ontario);
        assert_eq!(user.security_question, SecurityQuestion::BirthCity);
        assert_eq!(user.subscription, Subscription::Free);
        assert_eq!(user.phone_number, None);
        assert_eq!(user.number_of_employees, None);
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let err = request(json!({ "province": "Atlantis" }))
            .into_new_user("$argon2id$x".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid province: Atlantis");

        assert!(
            request(json!({ "subscription": "Gold Tier" }))
                .into_new_user("$argon2id$x".to_string())
                .is_err()
        );
    }

    #[test]
    fn subscription_defaults_to_free() {
        let mut req = request(json!({}));
        req.subscription = None;
        assert_eq!(
            req.into_new_user("$argon2id$x".to_string()).unwrap().subscription,
            Subscription::Free
        );
    }
}
