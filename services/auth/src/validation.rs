//! Input validation for registration and login payloads

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AuthError, AuthResult};

fn invalid(msg: &str) -> AuthError {
    AuthError::Validation(msg.to_string())
}

/// Validate username
pub fn validate_username(username: &str) -> AuthResult<()> {
    if username.is_empty() {
        return Err(invalid("Username is required"));
    }

    if username.len() < 3 {
        return Err(invalid("Username must be at least 3 characters long"));
    }

    if username.len() > 32 {
        return Err(invalid("Username must be at most 32 characters long"));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("Failed to compile username regex")
    });

    if !regex.is_match(username) {
        return Err(invalid(
            "Username can only contain letters, numbers, dots, dashes and underscores",
        ));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> AuthResult<()> {
    if email.is_empty() {
        return Err(invalid("Email is required"));
    }

    if email.len() > 254 {
        return Err(invalid("Email must be at most 254 characters long"));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(invalid("Invalid email format"));
    }

    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> AuthResult<()> {
    if password.is_empty() {
        return Err(invalid("Password is required"));
    }

    if password.len() < 8 {
        return Err(invalid("Password must be at least 8 characters long"));
    }

    if password.len() > 128 {
        return Err(invalid("Password must be at most 128 characters long"));
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if !c.is_alphanumeric() {
            has_special = true;
        }
    }

    if !has_upper {
        return Err(invalid("Password must contain at least one uppercase letter"));
    }

    if !has_lower {
        return Err(invalid("Password must contain at least one lowercase letter"));
    }

    if !has_digit {
        return Err(invalid("Password must contain at least one digit"));
    }

    if !has_special {
        return Err(invalid("Password must contain at least one special character"));
    }

    Ok(())
}

/// Both password fields of a form must agree
pub fn validate_confirmation(password: &str, confirmation: &str) -> AuthResult<()> {
    if password != confirmation {
        return Err(invalid("Passwords do not match"));
    }
    Ok(())
}

/// Validate an optional phone number
pub fn validate_phone(phone: &str) -> AuthResult<()> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[0-9 ().-]{7,20}$").expect("Failed to compile phone regex")
    });

    if !regex.is_match(phone) {
        return Err(invalid("Invalid phone number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: AuthResult<()>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.l-i_ce").is_ok());
        assert_eq!(message(validate_username("")), "Username is required");
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice smith").is_err());
    }

    #[test]
    fn emails() {
        assert!(validate_email("a@x.com").is_ok());
        assert_eq!(message(validate_email("a@x")), "Invalid email format");
    }

    #[test]
    fn passwords() {
        assert!(validate_password("Secur3P@ss").is_ok());
        assert_eq!(
            message(validate_password("short")),
            "Password must be at least 8 characters long"
        );
        assert!(validate_password("alllowercase1!").is_err());
        assert!(validate_password("NoDigits!!").is_err());
        assert!(validate_password("NoSpecial123").is_err());
    }

    #[test]
    fn confirmation_must_match() {
        assert!(validate_confirmation("Secur3P@ss", "Secur3P@ss").is_ok());
        assert_eq!(
            message(validate_confirmation("Secur3P@ss", "Secur3P@sz")),
            "Passwords do not match"
        );
    }

    #[test]
    fn cached_patterns_accept_well_formed_input_on_reuse() {
        for _ in 0..2 {
            assert!(validate_username("bob_99").is_ok());
            assert!(validate_email("bob@example.org").is_ok());
            assert!(validate_phone("416-555-0100").is_ok());
        }
    }

    #[test]
    fn phones() {
        assert!(validate_phone("+1 (416) 555-0100").is_ok());
        assert!(validate_phone("call me").is_err());
    }
}
