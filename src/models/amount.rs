use std::fmt;

use alloy::primitives::U256;

use crate::error::ValidationError;

/// Number of wei in one ether
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Number of decimal places between wei and ether
pub const ETHER_DECIMALS: usize = 18;

/// An amount of the native currency in base units (wei), covering the full
/// uint256 range of on-chain quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Amount = Amount(U256::ZERO);

    pub fn from_wei(wei: u128) -> Self {
        Self(U256::from(wei))
    }

    pub const fn as_wei(&self) -> U256 {
        self.0
    }

    /// Parse a JSON-RPC quantity such as `"0x1bc16d674ec80000"`
    pub fn from_hex(quantity: &str) -> Result<Self, ValidationError> {
        let digits = quantity.strip_prefix("0x").unwrap_or(quantity);
        let significant = digits.trim_start_matches('0');

        if significant.is_empty() {
            if digits.is_empty() && !quantity.starts_with("0x") {
                return Err(ValidationError::InvalidAmount(quantity.to_string()));
            }
            return Ok(Self::ZERO);
        }

        U256::from_str_radix(significant, 16)
            .map(Self)
            .map_err(|e| ValidationError::InvalidAmount(format!("{}: {}", quantity, e)))
    }

    /// Exact decimal rendering in ether, without trailing zeros
    pub fn to_ether_string(&self) -> String {
        let unit = U256::from(WEI_PER_ETHER);
        let whole = self.0 / unit;
        let fraction = self.0 % unit;

        if fraction.is_zero() {
            return whole.to_string();
        }

        let padded = format!("{:0>width$}", fraction.to_string(), width = ETHER_DECIMALS);
        format!("{}.{}", whole, padded.trim_end_matches('0'))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", self.to_ether_string())
    }
}
