//! Hex quantity and base-unit decoding

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};

/// Decimals of native EVM assets (wei per ether = 10^18).
pub const NATIVE_DECIMALS: u32 = 18;

/// Largest mantissa a `Decimal` can hold (2^96 - 1).
const MAX_MANTISSA: u128 = (1u128 << 96) - 1;

/// Parse a JSON-RPC hex quantity (`"0x1bc16d674ec80000"`) or a 32-byte ABI
/// word into an integer.
///
/// Leading zeros are allowed; anything that does not fit in 128 bits is an
/// error rather than a silently truncated value.
pub fn parse_hex_quantity(value: &str) -> CoreResult<u128> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| CoreError::UnknownProtocolResponse(format!("not a hex quantity: {value}")))?;

    if digits.is_empty() {
        return Err(CoreError::UnknownProtocolResponse(
            "empty hex quantity".to_string(),
        ));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CoreError::UnknownProtocolResponse(format!(
            "not a hex quantity: {value}"
        )));
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 32 {
        return Err(CoreError::Overflow(format!("{value} exceeds 128 bits")));
    }

    u128::from_str_radix(significant, 16)
        .map_err(|e| CoreError::UnknownProtocolResponse(format!("bad hex quantity {value}: {e}")))
}

/// Convert an integer amount of base units into whole units.
///
/// Exact whenever the raw amount fits a `Decimal` mantissa; larger amounts
/// drop their least significant digits first.
pub fn scale_base_units(raw: u128, decimals: u32) -> CoreResult<Decimal> {
    let mut mantissa = raw;
    let mut scale = decimals;

    while mantissa > MAX_MANTISSA && scale > 0 {
        mantissa /= 10;
        scale -= 1;
    }
    if mantissa > MAX_MANTISSA {
        return Err(CoreError::Overflow(format!(
            "{raw} base units with {decimals} decimals"
        )));
    }

    // Decimal supports at most 28 fractional digits.
    while scale > 28 {
        mantissa /= 10;
        scale -= 1;
    }

    let mantissa = i128::try_from(mantissa)
        .map_err(|_| CoreError::Overflow(format!("{raw} base units")))?;
    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map(|d| d.normalize())
        .map_err(|e| CoreError::Overflow(e.to_string()))
}

/// Native balance in whole units from a hex wei quantity.
pub fn wei_to_native(hex_wei: &str) -> CoreResult<Decimal> {
    scale_base_units(parse_hex_quantity(hex_wei)?, NATIVE_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_parse_quantities() {
        assert_eq!(parse_hex_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_hex_quantity("0x3c").unwrap(), 60);
        assert_eq!(parse_hex_quantity("0x1bc16d674ec80000").unwrap(), 2_000_000_000_000_000_000);
    }

    #[test]
    fn test_parse_abi_word_with_leading_zeros() {
        let word = format!("0x{}{}", "0".repeat(48), "0de0b6b3a7640000");
        assert_eq!(parse_hex_quantity(&word).unwrap(), 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_hex_quantity("0x").is_err());
        assert!(parse_hex_quantity("1234").is_err());
        assert!(parse_hex_quantity("0xnothex").is_err());
        assert!(parse_hex_quantity("0x1g").is_err());
    }

    #[test]
    fn test_parse_rejects_sign() {
        assert!(matches!(
            parse_hex_quantity("0x+1"),
            Err(CoreError::UnknownProtocolResponse(_))
        ));
        assert!(parse_hex_quantity("0x-1").is_err());
        assert!(matches!(
            parse_hex_quantity(&format!("0x1{}", "0".repeat(32))),
            Err(CoreError::Overflow(_))
        ));
    }

    #[test]
    fn test_wei_to_native() {
        assert_eq!(wei_to_native("0x1bc16d674ec80000").unwrap(), dec!(2));
        assert_eq!(wei_to_native("0x0").unwrap(), Decimal::ZERO);
        // 0.123456789012345678 ETH stays exact
        assert_eq!(
            scale_base_units(123_456_789_012_345_678, 18).unwrap(),
            dec!(0.123456789012345678)
        );
    }

    #[test]
    fn test_scale_huge_amount_drops_precision() {
        let raw = u128::MAX;
        let scaled = scale_base_units(raw, 18).unwrap();
        assert!(scaled > Decimal::from_str("340282366920000000000").unwrap());
    }

    #[test]
    fn test_scale_too_large_without_decimals() {
        assert!(scale_base_units(u128::MAX, 0).is_err());
    }
}
