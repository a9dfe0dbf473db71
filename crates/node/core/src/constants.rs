//! Defaults shared by the staker binary and its configuration.

use staker_primitives::Address;

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "STAKER_";

/// Account used for the in-process ledger when none is configured.
pub const DEFAULT_DEV_ACCOUNT: Address = Address::new([
    0xd3, 0xad, 0xbe, 0xef, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x01,
]);

/// Whole tokens held by the in-process ledger account at startup.
pub const DEFAULT_DEV_BALANCE: u64 = 500;

/// Whole tokens staked by the in-process ledger account at startup.
pub const DEFAULT_DEV_STAKE: u64 = 200;

/// Whole tokens of reward accrued to the in-process ledger account at startup.
pub const DEFAULT_DEV_REWARD: u64 = 15;
