//! Credential validation

use thiserror::Error;

/// Errors that can occur during credential validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Email address cannot be empty")]
    EmptyEmail,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Email address cannot exceed {0} characters")]
    EmailTooLong(usize),

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("Display name cannot exceed {0} characters")]
    NameTooLong(usize),
}

const MAX_EMAIL_LENGTH: usize = 254;
const MIN_PASSWORD_LENGTH: usize = 7;
const MAX_NAME_LENGTH: usize = 100;

/// Validate an email address.
///
/// Deliberately shallow: a non-empty string containing '@'. Anything
/// stricter rejects addresses that are valid in practice.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !email.contains('@') {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a password (length measured after trimming)
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.trim().len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Validate an optional display name
pub fn validate_display_name(name: &str) -> Result<(), UserValidationError> {
    if name.len() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a@b").is_ok());
    }

    #[test]
    fn test_empty_email() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
    }

    #[test]
    fn test_email_without_at() {
        assert_eq!(
            validate_email("alice.example.com"),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_email_too_long() {
        let long = format!("{}@x.com", "a".repeat(260));
        assert_eq!(
            validate_email(&long),
            Err(UserValidationError::EmailTooLong(254))
        );
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("seven77").is_ok());
        assert!(validate_password("a much longer password").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            validate_password("short"),
            Err(UserValidationError::PasswordTooShort(7))
        );
    }

    #[test]
    fn test_password_whitespace_not_counted() {
        // Padding with spaces must not satisfy the minimum length
        assert_eq!(
            validate_password("  abc   "),
            Err(UserValidationError::PasswordTooShort(7))
        );
    }

    #[test]
    fn test_display_name() {
        assert!(validate_display_name("Alice").is_ok());
        assert_eq!(
            validate_display_name(&"a".repeat(101)),
            Err(UserValidationError::NameTooLong(100))
        );
    }
}
