use lazy_static::lazy_static;
use regex::Regex;

pub const EMAIL_FORMAT_MESSAGE: &str =
    "The email must be in the format 'name@domain.com' or 'name@domain.br'.";
pub const PASSWORD_POLICY_MESSAGE: &str =
    "Password must be at least 8 characters long and contain both letters and numbers.";

const MIN_PASSWORD_LEN: usize = 8;

/// Client input that failed a format or policy check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", EMAIL_FORMAT_MESSAGE)]
    EmailFormat,
    #[error("{}", PASSWORD_POLICY_MESSAGE)]
    WeakPassword,
    #[error("The 'email' parameter is required.")]
    MissingEmail,
    #[error("The value must be a non-negative number.")]
    InvalidValue,
    #[error("Invalid query string: {0}")]
    Query(String),
}

/// Trim and lowercase an email before it is validated or looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    }
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::EmailFormat)
    }
}

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if long_enough && has_letter && has_digit {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

pub fn validate_value(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue)
    }
}

/// Resolve the `email` query parameter: present, non-blank, well formed.
pub fn require_email_param(email: Option<&str>) -> Result<String, ValidationError> {
    let email = match email.map(normalize_email) {
        Some(e) if !e.is_empty() => e,
        _ => return Err(ValidationError::MissingEmail),
    };
    validate_email_format(&email)?;
    Ok(email)
}
