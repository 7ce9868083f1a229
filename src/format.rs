//! Amount conversion and display helpers
//!
//! `parse_base_units` is exact (decimal arithmetic, truncating extra
//! precision); the display helpers are lossy and only used for output.
//!
//! Created: 2026-10-18

use crate::error::AmountError;
use alloy::primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Convert a human amount ("1.5") to base units for a token with `decimals`.
///
/// Digits beyond `decimals` are truncated toward zero.
pub fn parse_base_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let trimmed = amount.trim();
    let value = Decimal::from_str(trimmed).map_err(|_| AmountError::Invalid(trimmed.to_string()))?;

    let truncated = value.round_dp_with_strategy(decimals as u32, RoundingStrategy::ToZero);
    if truncated.is_sign_negative() || truncated.is_zero() {
        return Err(AmountError::NotPositive(trimmed.to_string()));
    }

    // scale <= decimals after rounding
    let exponent = decimals as u32 - truncated.scale();
    let mantissa = U256::from(truncated.mantissa().unsigned_abs());
    U256::from(10u64)
        .checked_pow(U256::from(exponent))
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or_else(|| AmountError::Overflow(trimmed.to_string()))
}

fn to_human(amount: U256, decimals: u8) -> f64 {
    let raw: f64 = amount.to_string().parse().unwrap_or(0.0);
    raw / 10f64.powi(decimals as i32)
}

/// Compact token amount: `0`, `<0.001`, 4 dp below 1, 3 dp below 1000, then K / M
pub fn format_amount(amount: U256, decimals: u8) -> String {
    let value = to_human(amount, decimals);
    if value == 0.0 {
        "0".to_string()
    } else if value < 0.001 {
        "<0.001".to_string()
    } else if value < 1.0 {
        format!("{:.4}", value)
    } else if value < 1_000.0 {
        format!("{:.3}", value)
    } else if value < 1_000_000.0 {
        format!("{:.2}K", value / 1_000.0)
    } else {
        format!("{:.2}M", value / 1_000_000.0)
    }
}

pub fn format_usd(usd: f64) -> String {
    if usd < 0.0 {
        return format!("-{}", format_usd(-usd));
    }
    if usd == 0.0 {
        "$0.00".to_string()
    } else if usd < 0.01 {
        "<$0.01".to_string()
    } else {
        format!("${:.2}", usd)
    }
}

/// `0x12345678...abcdef` style abbreviation
pub fn short_hash(hash: &str) -> String {
    if hash.len() <= 14 || !hash.is_ascii() {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..8], &hash[hash.len() - 6..])
}
