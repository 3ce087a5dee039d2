//! Rupee rounding and formatting helpers

use bigdecimal::{BigDecimal, RoundingMode};

/// Round to two decimal places, halves rounded up
///
/// Every stage of the tax pipeline rounds through this function so that
/// invoice totals can be reproduced from the per-item values.
pub fn round2(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// Fixed two-decimal rendering without a currency symbol
pub fn format_amount(amount: &BigDecimal) -> String {
    round2(amount).to_string()
}

/// Fixed two-decimal rendering with the rupee symbol
pub fn format_inr(amount: &BigDecimal) -> String {
    format!("₹{}", format_amount(amount))
}

/// Absolute difference between two amounts
pub fn difference(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    (a - b).abs()
}
