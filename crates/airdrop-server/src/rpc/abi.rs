//! Minimal ABI helpers for single-address view calls.

use airdrop_core::units::parse_hex_quantity;
use airdrop_core::{CoreError, CoreResult, EvmAddress};
use sha3::{Digest, Keccak256};

const WORD_HEX_LEN: usize = 64;

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Calldata for `fn(address)`: selector followed by the left-padded address.
pub fn encode_address_call(signature: &str, address: &EvmAddress) -> String {
    format!(
        "0x{}{:0>width$}",
        hex::encode(selector(signature)),
        address.hex_digits(),
        width = WORD_HEX_LEN
    )
}

/// First 32-byte word of call return data as an unsigned integer.
pub fn decode_uint_word(data: &str) -> CoreResult<u128> {
    let digits = data
        .strip_prefix("0x")
        .ok_or_else(|| CoreError::UnknownProtocolResponse(format!("missing 0x prefix: {data}")))?;

    let word = digits.get(..WORD_HEX_LEN).ok_or_else(|| {
        CoreError::UnknownProtocolResponse(format!(
            "return data shorter than one word ({} bytes)",
            digits.len()
        ))
    })?;
    if !word.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CoreError::UnknownProtocolResponse(format!(
            "return data is not hex: {word}"
        )));
    }

    parse_hex_quantity(&format!("0x{word}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selectors() {
        assert_eq!(hex::encode(selector("balanceOf(address)")), "70a08231");
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
    }

    #[test]
    fn test_encode_address_call() {
        let address = EvmAddress::parse("0x1691565C9E5846B348BF21707521E492614DF376").unwrap();
        let data = encode_address_call("balanceOf(address)", &address);

        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.starts_with("0x70a08231000000000000000000000000"));
        assert!(data.ends_with("1691565c9e5846b348bf21707521e492614df376"));
    }

    #[test]
    fn test_decode_words() {
        let one_token = format!("0x{:0>64}", "de0b6b3a7640000");
        assert_eq!(decode_uint_word(&one_token).unwrap(), 1_000_000_000_000_000_000);

        let two_words = format!("0x{:0>64}{:0>64}", "1", "ff");
        assert_eq!(decode_uint_word(&two_words).unwrap(), 1);

        assert!(decode_uint_word("0x").is_err());
    }

    #[test]
    fn test_decode_rejects_non_hex_word() {
        let multibyte = format!("0x{}é", "a".repeat(63));
        assert!(matches!(
            decode_uint_word(&multibyte),
            Err(CoreError::UnknownProtocolResponse(_))
        ));

        let signed = format!("0x+{:0>63}", "1");
        assert!(decode_uint_word(&signed).is_err());
        assert!(decode_uint_word(&format!("0x{:z>64}", "")).is_err());
    }
}
