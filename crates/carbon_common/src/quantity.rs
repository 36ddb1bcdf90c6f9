//! Quantity validation, run before any calculation request.

use crate::error::ValidationError;

/// Parse a user-entered quantity. Accepts finite values strictly above zero.
pub fn validate_quantity(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingQuantity);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidQuantity)?;

    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidQuantity);
    }

    Ok(value)
}
