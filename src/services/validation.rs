use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Credentials, ValidationErrors};

const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if credentials.email.is_empty() {
        errors.email = Some(String::from("Email is required"));
    } else if !validate_email(&credentials.email) {
        errors.email = Some(String::from("Please enter a valid email address"));
    }

    if credentials.password.is_empty() {
        errors.password = Some(String::from("Password is required"));
    } else if !validate_password(&credentials.password) {
        errors.password = Some(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
