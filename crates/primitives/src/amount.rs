//! Fixed-point token amounts.
//!
//! An [`Amount`] is a non-negative count of base units, with [`DECIMALS`]
//! fractional decimal digits per token. All arithmetic is exact and checked:
//! subtraction below zero fails with [`AmountError::Underflow`] instead of
//! wrapping.

use core::{fmt, str::FromStr};

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{BASE_UNITS_PER_TOKEN, DECIMALS};

/// Errors produced by amount arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// Result would be negative.
    #[error("amount underflow")]
    Underflow,

    /// Result would exceed the 256-bit base unit range.
    #[error("amount overflow")]
    Overflow,
}

/// Errors produced when parsing amount text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAmountError {
    /// Input was empty (or only a decimal point).
    #[error("empty amount")]
    Empty,

    /// Input carried a minus sign.
    #[error("amount must not be negative")]
    Negative,

    /// Input contained a character that is not a decimal digit.
    #[error("invalid character {0:?} in amount")]
    InvalidDigit(char),

    /// Input had more fractional digits than the ledger supports.
    #[error("amount has more than {max} decimal places")]
    TooManyDecimals {
        /// Maximum number of fractional digits.
        max: usize,
    },

    /// Input does not fit in 256 bits of base units.
    #[error("amount too large")]
    Overflow,
}

/// A non-negative token quantity in ledger base units.
///
/// `Amount` is an immutable value: every operation returns a new amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    /// Zero tokens.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Create an amount from raw base units.
    pub const fn from_base_units(units: U256) -> Self {
        Self(units)
    }

    /// Create an amount of whole tokens.
    pub fn from_tokens(tokens: u64) -> Self {
        Self(U256::from(tokens) * BASE_UNITS_PER_TOKEN)
    }

    /// Raw base units.
    pub const fn base_units(&self) -> U256 {
        self.0
    }

    /// Whether this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Add two amounts.
    pub fn checked_add(self, other: Self) -> Result<Self, AmountError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(AmountError::Overflow)
    }

    /// Subtract `other`, failing if the result would be negative.
    pub fn checked_sub(self, other: Self) -> Result<Self, AmountError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(AmountError::Underflow)
    }

    /// Parse a decimal token amount such as `"12.5"`.
    ///
    /// Accepts `digits`, `digits.digits`, `digits.` and `.digits`, with
    /// surrounding whitespace ignored.
    pub fn parse(text: &str) -> Result<Self, ParseAmountError> {
        let text = text.trim();
        if text.starts_with('-') {
            return Err(ParseAmountError::Negative);
        }

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseAmountError::Empty);
        }
        if let Some(c) = whole.chars().chain(fraction.chars()).find(|c| !c.is_ascii_digit()) {
            return Err(ParseAmountError::InvalidDigit(c));
        }
        if fraction.len() > DECIMALS {
            return Err(ParseAmountError::TooManyDecimals { max: DECIMALS });
        }

        let whole = parse_digits(whole)?;
        let fraction = parse_digits(&format!("{fraction:0<DECIMALS$}"))?;

        whole
            .checked_mul(BASE_UNITS_PER_TOKEN)
            .and_then(|units| units.checked_add(fraction))
            .map(Self)
            .ok_or(ParseAmountError::Overflow)
    }

    /// Canonical decimal representation, e.g. `"500.0"` or `"0.25"`.
    pub fn format(&self) -> String {
        self.to_string()
    }
}

fn parse_digits(digits: &str) -> Result<U256, ParseAmountError> {
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10).map_err(|_| ParseAmountError::Overflow)
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / BASE_UNITS_PER_TOKEN;
        let fraction = (self.0 % BASE_UNITS_PER_TOKEN).to_string();
        let fraction = format!("{fraction:0>DECIMALS$}");
        let fraction = fraction.trim_end_matches('0');

        if fraction.is_empty() {
            write!(f, "{whole}.0")
        } else {
            write!(f, "{whole}.{fraction}")
        }
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<U256> for Amount {
    fn from(units: U256) -> Self {
        Self(units)
    }
}

impl From<Amount> for U256 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts decimal strings and, for configuration sources that type their
/// values (environment variables), bare whole numbers.
struct AmountVisitor;

impl serde::de::Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal token amount")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::from_tokens(v))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
        u64::try_from(v)
            .map(Amount::from_tokens)
            .map_err(|_| E::custom(ParseAmountError::Negative))
    }

    /// Floats are refused: the source already rounded the value to binary
    /// precision, so the decimal the user wrote is lost.
    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Amount, E> {
        Err(E::custom(format_args!(
            "fractional amount {v} must be quoted as a decimal string"
        )))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
