//! Ether amounts as typed by users and shown in listings

use crate::error::{ContractError, Result};
use alloy::primitives::U256;
use alloy::primitives::utils::{format_ether, parse_ether};

/// Wei amount in ether with trailing zeros trimmed (`"1.5"`, `"0"`)
pub fn display_ether(wei: U256) -> String {
    let text = format_ether(wei);
    match text.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{frac}")
            }
        }
        None => text,
    }
}

/// Parse a strictly positive bet amount such as `"0.25"` into wei
pub fn parse_bet_amount(amount: &str) -> Result<U256> {
    let invalid = |reason: String| ContractError::InvalidAmount {
        amount: amount.to_string(),
        reason,
    };

    let text = amount.trim();
    if text.is_empty() {
        return Err(invalid("empty amount".to_string()));
    }
    // parse_ether accepts signed input and returns its magnitude
    if text.starts_with(['-', '+']) {
        return Err(invalid("expected an unsigned amount".to_string()));
    }

    let wei = parse_ether(text).map_err(|e| invalid(e.to_string()))?;
    if wei.is_zero() {
        return Err(invalid("amount must be greater than zero".to_string()));
    }
    Ok(wei)
}
