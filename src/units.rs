use alloy::primitives::{utils, U256};
use anyhow::{anyhow, bail, Result};

/// Gwei → wei.
pub const GWEI: u128 = 1_000_000_000;

/// Render a base-unit amount with `decimals` places, trailing zeros stripped.
pub fn format_units(value: U256, decimals: u8) -> Result<String> {
    let formatted = utils::format_units(value, decimals)
        .map_err(|e| anyhow!("Cannot format {} with {} decimals: {}", value, decimals, e))?;
    Ok(trim_fraction(&formatted).to_string())
}

/// Parse a human amount like `"1.5"` into base units. Fractions finer than
/// `decimals` are rejected rather than truncated.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256> {
    let amount = amount.trim();
    if amount.is_empty() {
        bail!("Amount must not be empty");
    }
    if amount.starts_with('-') {
        bail!("Amount must not be negative: {}", amount);
    }
    if let Some((_, fraction)) = amount.split_once('.') {
        if fraction.len() > decimals as usize {
            bail!("Amount {} has more than {} decimal places", amount, decimals);
        }
    }

    let parsed = utils::parse_units(amount, decimals)
        .map_err(|e| anyhow!("Invalid amount {}: {}", amount, e))?;
    Ok(parsed.get_absolute())
}

fn trim_fraction(formatted: &str) -> &str {
    match formatted.split_once('.') {
        Some(_) => formatted.trim_end_matches('0').trim_end_matches('.'),
        None => formatted,
    }
}
