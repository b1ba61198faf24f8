use garde::Validate;

use crate::error::{AppError, Result};

/// Validates a guest identifier taken from the `X-Guest-Id` header.
///
/// # Arguments
///
/// * `guest_id` - The raw header value.
///
/// # Returns
///
/// A `Result<()>` indicating whether the guest id is valid.
pub fn validate_guest_id(guest_id: &str) -> Result<()> {
    if guest_id.len() < 8 {
        return Err(AppError::Validation(
            "X-Guest-Id must be at least 8 characters long".to_string(),
        ));
    }

    if guest_id.len() > 64 {
        return Err(AppError::Validation(
            "X-Guest-Id must be at most 64 characters".to_string(),
        ));
    }

    if !guest_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "X-Guest-Id can only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    Ok(())
}

/// Runs the garde rules on `value` and reports the first failure.
pub fn check_garde<T: Validate<Context = ()>>(value: &T) -> Result<()> {
    value.validate().map_err(|report| {
        let message = report
            .iter()
            .next()
            .map(|(path, error)| format!("{}: {}", path, error))
            .unwrap_or_else(|| "Invalid request".to_string());
        AppError::Validation(message)
    })
}

/// Lower-cases and trims an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
