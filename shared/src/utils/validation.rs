//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Length of the one-time codes sent by email
pub const OTP_CODE_LENGTH: usize = 6;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

/// Check the basic shape of an email address
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Normalize an email for use as a lookup key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check the password length policy
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

/// Check that a one-time code is the expected number of digits
pub fn is_valid_otp_code(code: &str) -> bool {
    code.len() == OTP_CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit())
}

/// Mask an email for logging, keeping the first character and the domain
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@uni.edu.au"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a b@x.com"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }

    #[test]
    fn test_password_policy() {
        assert!(is_valid_password("pw123456"));
        assert!(!is_valid_password("short"));
    }

    #[test]
    fn test_otp_code_shape() {
        assert!(is_valid_otp_code("000000"));
        assert!(!is_valid_otp_code("12345"));
        assert!(!is_valid_otp_code("12a456"));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@uni.edu"), "a***@uni.edu");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
