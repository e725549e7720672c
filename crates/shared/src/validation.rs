//! Common validation utilities used by request DTOs.

use chrono::{NaiveDateTime, Timelike};
use validator::ValidationError;

lazy_static::lazy_static! {
    static ref SUBDOMAIN_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").unwrap();
}

/// Subdomains that cannot be claimed through self-service registration.
pub const RESERVED_SUBDOMAINS: &[&str] = &["system", "admin", "api", "www", "app"];

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a tenant subdomain: 3-63 lowercase alphanumerics or hyphens,
/// no leading or trailing hyphen, not reserved.
pub fn validate_subdomain(subdomain: &str) -> Result<(), ValidationError> {
    if !(3..=63).contains(&subdomain.len()) {
        return Err(error(
            "subdomain_length",
            "Subdomain must be 3-63 characters",
        ));
    }
    if !SUBDOMAIN_REGEX.is_match(subdomain) {
        return Err(error(
            "subdomain_format",
            "Subdomain must be lowercase alphanumeric with hyphens, no leading/trailing hyphens",
        ));
    }
    if RESERVED_SUBDOMAINS.contains(&subdomain) {
        return Err(error("subdomain_reserved", "Subdomain is reserved"));
    }
    Ok(())
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value must not be blank"))
    } else {
        Ok(())
    }
}

/// Rejects timestamps finer than the microsecond precision of the database.
pub fn validate_microsecond_precision(value: &NaiveDateTime) -> Result<(), ValidationError> {
    if value.nanosecond() % 1_000 != 0 {
        Err(error(
            "timestamp_precision",
            "Timestamps support at most microsecond precision",
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microsecond_precision() {
        let parse = |s: &str| s.parse::<NaiveDateTime>().unwrap();

        assert!(validate_microsecond_precision(&parse("2026-03-01T09:30:00")).is_ok());
        assert!(validate_microsecond_precision(&parse("2026-03-01T09:30:00.123456")).is_ok());
        assert!(validate_microsecond_precision(&parse("2026-03-01T09:30:00.123456789")).is_err());
        assert!(validate_microsecond_precision(&parse("2026-03-01T09:30:00.000000001")).is_err());
    }

    #[test]
    fn test_valid_subdomains() {
        assert!(validate_subdomain("acme").is_ok());
        assert!(validate_subdomain("acme-labs").is_ok());
        assert!(validate_subdomain("a1b").is_ok());
    }

    #[test]
    fn test_invalid_subdomain_format() {
        assert!(validate_subdomain("Acme").is_err());
        assert!(validate_subdomain("-acme").is_err());
        assert!(validate_subdomain("acme-").is_err());
        assert!(validate_subdomain("ac me").is_err());
        assert!(validate_subdomain("ab").is_err());
        assert!(validate_subdomain(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_reserved_subdomain() {
        let err = validate_subdomain("system").unwrap_err();
        assert_eq!(err.code, "subdomain_reserved");
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("x").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }
}
