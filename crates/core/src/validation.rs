//! Shared input validation helpers.
//!
//! Request DTOs derive [`validator::Validate`]; [`validate_input`] folds the
//! resulting errors into a [`CoreError::Validation`] so handlers can use `?`.

use validator::Validate;

use crate::error::CoreError;

/// Maximum page size accepted by list endpoints that forward paging.
pub const MAX_PAGE_LIMIT: i64 = 500;
/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Run derived validation rules on `input`.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(errors.to_string()))
}

/// Validate that a required text field is not blank.
pub fn validate_non_blank(value: &str, name: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}

/// Clamp a caller-supplied page limit into `1..=MAX_PAGE_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

/// Clamp a caller-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
