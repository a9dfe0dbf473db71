//! Primitive types for the staking client.
//!
//! - [`Amount`] - Exact fixed-point token amount (18 decimals)
//! - [`parse_recipient`] - Recipient address validation
//!
//! `Address` and `U256` are re-exported from `alloy_primitives` so that
//! downstream crates agree on one definition.

mod address;
mod amount;
pub mod constants;

pub use address::{AddressError, parse_recipient};
pub use amount::{Amount, AmountError, ParseAmountError};
pub use constants::{DECIMALS, TOKEN_SYMBOL};

pub use alloy_primitives::{Address, U256};
