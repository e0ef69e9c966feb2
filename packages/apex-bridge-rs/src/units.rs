//! Amount units
//!
//! Amounts are carried as integers in a chain's smallest unit. UTXO chains
//! use 6 decimals and account chains 18, so moving an amount between the two
//! is a scale by 10^12. Callers convert into the source chain's unit before
//! validating a transfer.

use alloy::primitives::utils::{format_units, parse_units, ParseUnits};

use crate::types::{ACCOUNT_DECIMALS, UTXO_DECIMALS};

/// Decimal digits in `u128::MAX`
const MAX_AMOUNT_DIGITS: usize = 39;
const UTXO_TO_ACCOUNT_SCALE: u128 = 10u128.pow(ACCOUNT_DECIMALS - UTXO_DECIMALS);

/// Scale a 6-decimal amount to 18 decimals. `None` on overflow.
pub fn utxo_to_account(amount: u128) -> Option<u128> {
    amount.checked_mul(UTXO_TO_ACCOUNT_SCALE)
}

/// Scale an 18-decimal amount to 6 decimals, dropping the remainder
pub fn account_to_utxo(amount: u128) -> u128 {
    amount / UTXO_TO_ACCOUNT_SCALE
}

/// Render a smallest-unit amount in display units, e.g. `1_500_000` with 6
/// decimals is `"1.5"`. Trailing fractional zeros are dropped.
pub fn format_amount(amount: u128, decimals: u32) -> String {
    let formatted = u8::try_from(decimals)
        .ok()
        .and_then(|units| format_units(amount, units).ok());
    match formatted {
        // Always "{whole}.{fraction}"
        Some(text) => text.trim_end_matches('0').trim_end_matches('.').to_string(),
        None => amount.to_string(),
    }
}

/// Parse a display-unit amount ("1.5", "0.001", "42") into smallest units.
///
/// Returns `None` for malformed input, more fractional digits than
/// `decimals`, or overflow.
pub fn parse_amount(text: &str, decimals: u32) -> Option<u128> {
    let text = text.trim();
    let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Excess fractional digits would be truncated by the unit parser
    if frac.len() > decimals as usize {
        return None;
    }
    // Anything with more digits than this cannot fit in a u128
    let significant = whole.trim_start_matches('0').len();
    if significant + decimals as usize > MAX_AMOUNT_DIGITS {
        return None;
    }

    let units = u8::try_from(decimals).ok()?;
    match parse_units(text, units).ok()? {
        ParseUnits::U256(value) => u128::try_from(value).ok(),
        ParseUnits::I256(_) => None,
    }
}
