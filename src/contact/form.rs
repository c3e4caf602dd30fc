use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_NAME_CHARS: usize = 2;
const MIN_MESSAGE_CHARS: usize = 10;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Please enter your name.")]
    Name,
    #[error("Please enter a valid email address.")]
    Email,
    #[error("Message must be at least 10 characters.")]
    Message,
}

/// The JSON body posted to `/api/contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Raw form input as typed by the visitor.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    /// Trims every field and checks it, reporting all failures at once.
    pub fn validate(&self) -> Result<ContactRequest, Vec<FieldError>> {
        let request = ContactRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        };

        let mut errors = Vec::new();
        if request.name.chars().count() < MIN_NAME_CHARS {
            errors.push(FieldError::Name);
        }
        if !is_valid_email(&request.email) {
            errors.push(FieldError::Email);
        }
        if request.message.chars().count() < MIN_MESSAGE_CHARS {
            errors.push(FieldError::Message);
        }

        if errors.is_empty() {
            Ok(request)
        } else {
            Err(errors)
        }
    }
}

/// `local@domain.tld` shape check: no whitespace, exactly one `@`, and a dot
/// with something on both sides after it.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// The inline note shown for a failed validation.
pub fn error_note(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reports_every_error() {
        let errors = ContactForm::new("A", "bad", "short").validate().unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::Name, FieldError::Email, FieldError::Message]
        );
        assert_eq!(
            error_note(&errors),
            "Please enter your name. Please enter a valid email address. Message must be at least 10 characters."
        );
    }

    #[test]
    fn test_validate_trims_fields() {
        let request = ContactForm::new("  Ada ", " ada@example.com ", "  Hello there, friend  ")
            .validate()
            .unwrap();
        assert_eq!(request.name, "Ada");
        assert_eq!(request.email, "ada@example.com");
        assert_eq!(request.message, "Hello there, friend");
    }

    #[test]
    fn test_whitespace_only_fields_fail() {
        let errors = ContactForm::new("   ", "a@b.co", "          x").validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::Name, FieldError::Message]);
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("bad"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b.co\t"));
        assert!(!is_valid_email("a@b\u{00a0}.co"));
        assert!(is_valid_email("a@b.c.d"));
    }
}
