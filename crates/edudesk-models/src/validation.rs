//! Custom validators used by the request DTOs.
//!
//! Error codes produced here (`phone`, `password`) are the keys the HTTP
//! layer translates into localized messages.

use std::borrow::Cow;

use validator::ValidationError;

pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 64;

/// 6 to 20 digits with an optional leading `+`.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let valid = (6..=20).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

/// Password on update DTOs: empty means "leave unchanged".
pub fn validate_update_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if password.is_empty() || (PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Ok(());
    }

    let mut err = ValidationError::new("password");
    err.add_param(Cow::Borrowed("min"), &PASSWORD_MIN);
    err.add_param(Cow::Borrowed("max"), &PASSWORD_MAX);
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_digits_with_optional_plus() {
        assert!(validate_phone("123456").is_ok());
        assert!(validate_phone("+8613800138000").is_ok());
        assert!(validate_phone("12345678901234567890").is_ok());
    }

    #[test]
    fn test_phone_rejects_bad_values() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("123456789012345678901").is_err());
        assert!(validate_phone("12-3456-78").is_err());
        assert!(validate_phone("++123456").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_update_password_allows_empty() {
        assert!(validate_update_password("").is_ok());
        assert!(validate_update_password("secret1").is_ok());
        let err = validate_update_password("abc").unwrap_err();
        assert_eq!(err.code, "password");
    }
}
