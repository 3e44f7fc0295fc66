//! Money Conversion Module
//!
//! Unified conversion between receipt-facing currency strings and
//! `rust_decimal::Decimal`. All currency parsing and rounding MUST go
//! through this module.
//!
//! ## Design Principles
//! 1. Total arithmetic at the aggregation boundary: a malformed price
//!    degrades to zero (logged), it never aborts a derived view
//! 2. Round once, at the end of a computation, not per item
//! 3. Two fractional digits in every presented amount

use rust_decimal::prelude::*;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Money conversion errors
#[derive(Debug, Error)]
pub enum MoneyError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Amount cannot be negative")]
    Negative,
}

// ============================================================================
// Parse: Receipt → Decimal
// ============================================================================

/// Parse a `"$<number>"` currency string into a `Decimal`.
///
/// The leading `$` is optional; surrounding whitespace is ignored.
///
/// # Errors
/// * `InvalidFormat` - not a decimal number
/// * `Negative` - negative amounts are not valid receipt prices
pub fn parse_currency(raw: &str) -> Result<Decimal, MoneyError> {
    let trimmed = raw.trim().trim_start_matches('$').trim();
    if trimmed.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    let amount = Decimal::from_str(trimmed)
        .map_err(|_| MoneyError::InvalidFormat(format!("not a decimal: {:?}", raw)))?;

    if amount.is_sign_negative() {
        return Err(MoneyError::Negative);
    }

    Ok(amount)
}

/// Tolerant variant of [`parse_currency`]: malformed input degrades to zero.
///
/// Aggregation arithmetic must stay total, so one unreadable price line
/// contributes nothing instead of blanking the whole summary.
pub fn currency_or_zero(raw: &str) -> Decimal {
    match parse_currency(raw) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!("unparseable amount {:?} treated as 0: {}", raw, e);
            Decimal::ZERO
        }
    }
}

// ============================================================================
// Rounding
// ============================================================================

/// Round to 2 decimal places, half away from zero.
///
/// Matches the display rounding of the billing surface (`toFixed(2)`-style),
/// not banker's rounding.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to the nearest whole number, half away from zero.
///
/// Used wherever a percentage is forced to an integer at the point of
/// storage (manual edits, equal distribution).
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ============================================================================
// Format: Decimal → Client
// ============================================================================

/// Format an amount with exactly 2 fractional digits (no currency symbol).
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round2(amount))
}

// ============================================================================
// Unit Tests
// ============================================================================
