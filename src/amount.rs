// src/amount.rs
//
// Conversion between human decimal strings and integer base-unit amounts.
// All arithmetic is exact U256 integer math; floating point would drift for
// high-decimal tokens.

use ethers_core::types::U256;
use thiserror::Error;

use crate::error::ToolError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount must be a non-negative decimal number, got '{0}'")]
    NotANumber(String),
    #[error("amount '{0}' has more fractional digits than the token's {1} decimals")]
    ExcessPrecision(String, u32),
    #[error("amount '{0}' overflows the 256-bit base-unit range")]
    Overflow(String),
}

impl From<AmountError> for ToolError {
    fn from(err: AmountError) -> Self {
        ToolError::Validation(err.to_string())
    }
}

/// Parse a human-readable decimal amount into base units.
///
/// `"1.5"` at 18 decimals becomes `1500000000000000000`. Excess fractional
/// digits are rejected rather than truncated; trailing zeros in the fraction
/// carry no value and are ignored, so `"1.50"` at one decimal is fine while
/// `"1.55"` is not.
pub fn parse_units(human: &str, decimals: u32) -> Result<U256, AmountError> {
    let trimmed = human.trim();
    if trimmed.is_empty() || trimmed == "." {
        return Err(AmountError::NotANumber(human.to_string()));
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(AmountError::NotANumber(human.to_string()));
    }

    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.len() as u32 > decimals {
        return Err(AmountError::ExcessPrecision(human.to_string(), decimals));
    }

    let scale = checked_exp10(decimals).ok_or_else(|| AmountError::Overflow(human.to_string()))?;
    let int_units = parse_digits(int_part)?
        .checked_mul(scale)
        .ok_or_else(|| AmountError::Overflow(human.to_string()))?;

    // Pad the fraction out to `decimals` digits so it lines up as base units.
    let mut frac_padded = frac_part.to_string();
    while (frac_padded.len() as u32) < decimals {
        frac_padded.push('0');
    }
    let frac_units = parse_digits(&frac_padded)?;

    int_units
        .checked_add(frac_units)
        .ok_or_else(|| AmountError::Overflow(human.to_string()))
}

/// Render a base-unit amount back into human decimal form, trimming
/// trailing fraction zeros. The inverse of `parse_units`.
pub fn format_units(value: U256, decimals: u32) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let scale = match checked_exp10(decimals) {
        Some(s) => s,
        // Unreachable for any real token, but don't panic on absurd decimals.
        None => return value.to_string(),
    };
    let int_part = value / scale;
    let frac_part = value % scale;

    let mut frac_str = frac_part.to_string();
    while (frac_str.len() as u32) < decimals {
        frac_str.insert(0, '0');
    }
    let frac_str = frac_str.trim_end_matches('0');
    if frac_str.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_str)
    }
}

fn parse_digits(digits: &str) -> Result<U256, AmountError> {
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits).map_err(|_| AmountError::Overflow(digits.to_string()))
}

// U256::exp10 panics on overflow; 10^78 no longer fits.
fn checked_exp10(decimals: u32) -> Option<U256> {
    if decimals > 77 {
        return None;
    }
    Some(U256::exp10(decimals as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_number() {
        assert_eq!(parse_units("1", 18).unwrap(), U256::exp10(18));
        assert_eq!(parse_units("0", 18).unwrap(), U256::zero());
        assert_eq!(parse_units("42", 0).unwrap(), U256::from(42u64));
    }

    #[test]
    fn test_parse_fractional() {
        assert_eq!(
            parse_units("1.5", 18).unwrap(),
            U256::from_dec_str("1500000000000000000").unwrap()
        );
        assert_eq!(parse_units("0.000001", 6).unwrap(), U256::one());
        assert_eq!(parse_units(".5", 1).unwrap(), U256::from(5u64));
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        let err = parse_units("1.234", 2).unwrap_err();
        assert_eq!(err, AmountError::ExcessPrecision("1.234".to_string(), 2));
        // Deterministic across repeated calls.
        assert_eq!(parse_units("1.234", 2).unwrap_err(), err);
    }

    #[test]
    fn test_parse_trailing_zeros_are_not_precision() {
        assert_eq!(parse_units("1.50", 1).unwrap(), U256::from(15u64));
        assert_eq!(parse_units("2.000", 0).unwrap(), U256::from(2u64));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", ".", "-1", "+1", "1e18", "1.2.3", "abc", "0x10"] {
            assert!(
                matches!(parse_units(bad, 18), Err(AmountError::NotANumber(_))),
                "expected NotANumber for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_overflow() {
        // 2^256 is roughly 1.16e77; this product cannot fit.
        let huge = "9".repeat(78);
        assert!(matches!(
            parse_units(&huge, 18),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::exp10(18), 18), "1");
        assert_eq!(
            format_units(U256::from_dec_str("1500000000000000000").unwrap(), 18),
            "1.5"
        );
        assert_eq!(format_units(U256::from(15u64), 1), "1.5");
        assert_eq!(format_units(U256::zero(), 18), "0");
        assert_eq!(format_units(U256::from(1u64), 6), "0.000001");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_round_trip() {
        // parse then format reconstructs the original numeric value exactly.
        for (amount, decimals) in [
            ("1", 18u32),
            ("1.5", 18),
            ("0.000000000000000001", 18),
            ("123456.789", 9),
            ("7", 0),
        ] {
            let units = parse_units(amount, decimals).unwrap();
            assert_eq!(format_units(units, decimals), amount);
        }
    }
}
