//! Stock invariant enforcement.
//!
//! Pure checks applied to every proposed product mutation before it is
//! committed. Safe to call repeatedly against speculative states; the
//! database CHECK constraints are only the last line of defence.

use rust_decimal::Decimal;

use crate::error::CoreError;

/// Replenishment cutoff used when a low-stock query supplies no threshold.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Compute the quantity that would result from applying `delta` to
/// `current`, rejecting any outcome below zero.
///
/// Returns `InsufficientStock` when the adjustment would drive the quantity
/// negative, and `InvalidInput` on arithmetic overflow.
pub fn apply_delta(current: i64, delta: i64) -> Result<i64, CoreError> {
    let candidate = current.checked_add(delta).ok_or_else(|| {
        CoreError::InvalidInput(format!("stock delta {delta} overflows current quantity"))
    })?;

    if candidate < 0 {
        return Err(CoreError::InsufficientStock {
            available: current,
            requested: delta,
        });
    }
    Ok(candidate)
}

/// Validate that a price is non-negative.
pub fn validate_price(price: Decimal) -> Result<(), CoreError> {
    if price.is_sign_negative() {
        return Err(CoreError::InvalidInput(format!(
            "price must be non-negative, got {price}"
        )));
    }
    Ok(())
}

/// Validate that a quantity is non-negative (used at product creation,
/// before any row exists to adjust).
pub fn validate_quantity(quantity: i64) -> Result<(), CoreError> {
    if quantity < 0 {
        return Err(CoreError::InvalidInput(format!(
            "quantity must be non-negative, got {quantity}"
        )));
    }
    Ok(())
}

/// Validate that a name is non-empty after trimming.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "name must not be empty".to_string(),
        ));
    }
    Ok(())
}
