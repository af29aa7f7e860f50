//! EVM address handling

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

/// A validated `0x`-prefixed, 40-hex-digit address, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EvmAddress(String);

impl EvmAddress {
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        if !validate_evm_address(trimmed) {
            return Err(CoreError::InvalidAddress(input.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 40 hex digits without the `0x` prefix.
    pub fn hex_digits(&self) -> &str {
        &self.0[2..]
    }
}

impl FromStr for EvmAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for EvmAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

pub fn validate_evm_address(address: &str) -> bool {
    let Some(digits) = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
    else {
        return false;
    };
    digits.len() == 40 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_mixed_case() {
        let addr = EvmAddress::parse("0x1691565c9E5846b348Bf21707521e492614df376").unwrap();
        assert_eq!(addr.as_str(), "0x1691565c9e5846b348bf21707521e492614df376");
        assert_eq!(addr.hex_digits().len(), 40);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(!validate_evm_address(""));
        assert!(!validate_evm_address("1691565c9e5846b348bf21707521e492614df376"));
        assert!(!validate_evm_address("0x1691565c9e5846b348bf21707521e492614df37"));
        assert!(!validate_evm_address("0x1691565c9e5846b348bf21707521e492614df3766"));
        assert!(!validate_evm_address("0xzz91565c9e5846b348bf21707521e492614df376"));
        assert!(EvmAddress::parse("not-an-address").is_err());
    }
}
