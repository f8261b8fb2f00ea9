use crate::error::ApiError;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid email regex")
});

/// E.164: a leading `+`, no leading zero, at most 15 digits.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("valid mobile regex"));

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn require(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if !EMAIL_RE.is_match(email) {
        return Err(ApiError::Validation(
            "Please provide a valid email".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_mobile_number(mobile_number: &str) -> Result<(), ApiError> {
    if !MOBILE_RE.is_match(mobile_number) {
        return Err(ApiError::Validation(
            "Please provide a valid mobile number with country code (e.g., +1234567890)"
                .to_string(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
