//! Ether denomination helpers
//!
//! Wallet values are `u128` amounts of wei. These helpers convert decimal
//! ether strings such as `"2"` or `"1.5"` to wei and back.

use thiserror::Error;

/// Decimal places in one ether
pub const ETHER_DECIMALS: usize = 18;

/// Wei in one ether
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Unit conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Too many decimal places (max 18): {0}")]
    TooManyDecimals(String),
    #[error("Amount overflow: {0}")]
    Overflow(String),
}

/// Parse a decimal ether amount into wei
pub fn parse_ether(input: &str) -> Result<u128, UnitsError> {
    let trimmed = input.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
    {
        return Err(UnitsError::InvalidAmount(input.to_string()));
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(UnitsError::TooManyDecimals(input.to_string()));
    }

    let overflow = || UnitsError::Overflow(input.to_string());

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(WEI_PER_ETHER)
            .ok_or_else(overflow)?
    };

    let fraction_wei = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = ETHER_DECIMALS);
        padded.parse::<u128>().map_err(|_| overflow())?
    };

    whole_wei.checked_add(fraction_wei).ok_or_else(overflow)
}

/// Format wei as a decimal ether amount, without trailing zeros
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let fraction = wei % WEI_PER_ETHER;

    if fraction == 0 {
        return whole.to_string();
    }

    let digits = format!("{:0>width$}", fraction, width = ETHER_DECIMALS);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
