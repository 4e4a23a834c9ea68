//! Input validation helpers
//!
//! Centralized text length constants and validation functions for the
//! CRUD handlers. Request bodies have an explicit schema per operation;
//! these helpers enforce the shared limits before anything hits storage.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, user, brand
pub const MAX_NAME_LEN: usize = 200;

/// Short free text: phone, zip, color codes, icons, status
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Descriptions (plain and rich)
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses (shipping and billing)
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a price or rating style number: finite and non-negative.
pub fn validate_non_negative(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_whitespace() {
        assert!(validate_required_text("", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Laptop", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn required_text_rejects_over_limit() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "brand", MAX_NAME_LEN).is_ok());
        let long = Some("x".repeat(MAX_NAME_LEN + 1));
        assert!(validate_optional_text(&long, "brand", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn non_negative_rejects_nan_and_negatives() {
        assert!(validate_non_negative(-1.0, "price").is_err());
        assert!(validate_non_negative(f64::NAN, "price").is_err());
        assert!(validate_non_negative(0.0, "price").is_ok());
        assert!(validate_non_negative(54.0, "price").is_ok());
    }
}
