//! Pure input validators
//!
//! Contract: synchronous, no side effects; an empty string means valid, a
//! non-empty human-readable message means invalid. Missing/empty input is
//! rejected before any length check.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").expect("whitespace regex"));

pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Outcome of the password strength check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordTestResult {
    pub message: String,
    pub is_valid: bool,
}

pub fn is_thread_title_valid(title: &str) -> String {
    is_string_valid("Title", title, 5, 150)
}

pub fn is_thread_body_valid(body: &str) -> String {
    is_string_valid("Body", body, 10, 2500)
}

/// Length check against the caller-supplied bounds
pub fn is_string_valid(label: &str, s: &str, min: usize, max: usize) -> String {
    if s.is_empty() {
        return format!("{} cannot be empty.", label);
    }
    if s.chars().count() < min {
        return format!("{} must be at least {} characters.", label, min);
    }
    if s.chars().count() > max {
        return format!("{} cannot be greater than {} characters.", label, max);
    }
    String::new()
}

pub fn is_email_valid(email: &str) -> String {
    if email.is_empty() {
        return "Email cannot be empty".to_string();
    }
    if !email.contains('@') {
        return "Please enter valid email address".to_string();
    }
    if WHITESPACE.is_match(email) {
        return "Email cannot have whitespaces".to_string();
    }
    String::new()
}

/// Strength predicate: length >= 8, at least one upper-case letter, one
/// digit, and one symbol.
pub fn is_password_valid(password: &str) -> PasswordTestResult {
    let mut result = PasswordTestResult {
        message: String::new(),
        is_valid: true,
    };

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        result.is_valid = false;
        result.message = format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LENGTH
        );
        return result;
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if !has_upper || !has_digit || !has_symbol {
        result.is_valid = false;
        result.message =
            "Password must contain at least 1 upper case character, 1 number and 1 symbol"
                .to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert!(!is_thread_title_valid("").is_empty());
        assert!(!is_thread_title_valid("abcd").is_empty());
        assert!(is_thread_title_valid("abcde").is_empty());
        assert!(is_thread_title_valid(&"a".repeat(150)).is_empty());
        assert!(!is_thread_title_valid(&"a".repeat(151)).is_empty());
    }

    #[test]
    fn test_body_bounds_use_parameters() {
        // Body bounds are 10/2500, not the title's 5/150
        assert!(!is_thread_body_valid("nine ch.!").is_empty());
        assert!(is_thread_body_valid("ten chars!").is_empty());
        assert!(is_thread_body_valid(&"b".repeat(2500)).is_empty());
        assert!(!is_thread_body_valid(&"b".repeat(2501)).is_empty());
        // A 200-char body is well within [10, 2500] even though it exceeds 150
        assert!(is_thread_body_valid(&"b".repeat(200)).is_empty());
    }

    #[test]
    fn test_string_messages_carry_bounds() {
        assert_eq!(
            is_string_valid("Body", "short", 10, 2500),
            "Body must be at least 10 characters."
        );
        assert_eq!(
            is_string_valid("Body", &"x".repeat(3000), 10, 2500),
            "Body cannot be greater than 2500 characters."
        );
    }

    #[test]
    fn test_email() {
        assert_eq!(is_email_valid(""), "Email cannot be empty");
        assert_eq!(is_email_valid("nobody"), "Please enter valid email address");
        assert_eq!(
            is_email_valid("a b@c.com"),
            "Email cannot have whitespaces"
        );
        assert_eq!(is_email_valid("a@b.com"), "");
    }

    #[test]
    fn test_password_too_short() {
        let result = is_password_valid("Ab1!");
        assert!(!result.is_valid);
        assert!(result.message.contains("at least 8"));
    }

    #[test]
    fn test_password_missing_classes() {
        assert!(!is_password_valid("abcd1234!").is_valid); // no upper
        assert!(!is_password_valid("Abcdefgh!").is_valid); // no digit
        assert!(!is_password_valid("Abcd12345").is_valid); // no symbol
        assert!(is_password_valid("Abcd1234!").is_valid);
    }
}
