//! Token constants shared with the staking contract.

use alloy_primitives::U256;

/// Number of fractional decimal digits in one token.
pub const DECIMALS: usize = 18;

/// Base units per whole token (10^18).
pub const BASE_UNITS_PER_TOKEN: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Ticker shown next to amounts.
pub const TOKEN_SYMBOL: &str = "STK";
