//! Exact conversion between human-scale token amounts and ledger base units.
//!
//! Every amount that reaches a transaction is an unsigned 64-bit integer of
//! base units, where one whole token (or one SUI) is `10^9` base units.
//! Parsing works on the decimal string directly so no floating point
//! rounding is ever involved.

use crate::error::{SuitudyError, SuitudyResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional decimal digits carried by the base unit.
pub const BASE_UNIT_DECIMALS: u32 = 9;

/// Base units in one whole token (`10^9`).
pub const BASE_UNITS_PER_TOKEN: u64 = 10u64.pow(BASE_UNIT_DECIMALS);

/// A monetary amount expressed in ledger base units.
///
/// # Example
///
/// ```rust
/// use suitudy_sdk::types::Amount;
///
/// let price: Amount = "50".parse().unwrap();
/// assert_eq!(price.base_units(), 50_000_000_000);
/// assert_eq!(price.to_string(), "50");
///
/// let half: Amount = "0.5".parse().unwrap();
/// assert_eq!(half.base_units(), 500_000_000);
/// ```
///
/// On the wire (JSON-RPC responses, event payloads) base-unit values are
/// decimal strings; both strings and plain numbers are accepted when
/// deserializing, and amounts serialize back as strings.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from raw base units.
    pub const fn from_base_units(base_units: u64) -> Self {
        Self(base_units)
    }

    /// Creates an amount from a whole number of tokens.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::InvalidInput`] if the scaled value does not fit in a `u64`.
    pub fn from_tokens(tokens: u64) -> SuitudyResult<Self> {
        tokens
            .checked_mul(BASE_UNITS_PER_TOKEN)
            .map(Self)
            .ok_or_else(|| SuitudyError::invalid_input(format!("amount {tokens} is too large")))
    }

    /// Returns the amount in base units, as embedded in transactions.
    pub const fn base_units(&self) -> u64 {
        self.0
    }

    /// Returns true if the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtracts `other`, returning `None` if it is larger than `self`.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Returns the whole-token part of the amount.
    pub const fn whole_tokens(&self) -> u64 {
        self.0 / BASE_UNITS_PER_TOKEN
    }

    /// Returns the fractional part in base units.
    pub const fn fractional_base_units(&self) -> u64 {
        self.0 % BASE_UNITS_PER_TOKEN
    }

    /// Formats the amount with a fixed number of fractional digits, truncating
    /// anything finer (used for balance display).
    pub fn to_fixed(&self, digits: u32) -> String {
        let digits = digits.min(BASE_UNIT_DECIMALS);
        if digits == 0 {
            return self.whole_tokens().to_string();
        }
        let frac = self.fractional_base_units() / 10u64.pow(BASE_UNIT_DECIMALS - digits);
        format!(
            "{}.{:0width$}",
            self.whole_tokens(),
            frac,
            width = digits as usize
        )
    }
}

impl FromStr for Amount {
    type Err = SuitudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SuitudyError::invalid_input("amount is required"));
        }
        if s.starts_with('-') {
            return Err(SuitudyError::invalid_input(format!(
                "amount cannot be negative: {s}"
            )));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(SuitudyError::invalid_input(format!("invalid amount: {s}")));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(SuitudyError::invalid_input(format!("invalid amount: {s}")));
        }
        if frac.len() > BASE_UNIT_DECIMALS as usize {
            return Err(SuitudyError::invalid_input(format!(
                "amount {s} has more than {BASE_UNIT_DECIMALS} decimal places"
            )));
        }

        let too_large = || SuitudyError::invalid_input(format!("amount {s} is too large"));

        let whole_units = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().map_err(|_| too_large())?
        };
        let frac_units = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = BASE_UNIT_DECIMALS as usize);
            padded.parse::<u64>().map_err(|_| too_large())?
        };

        whole_units
            .checked_mul(BASE_UNITS_PER_TOKEN)
            .and_then(|units| units.checked_add(frac_units))
            .map(Self)
            .ok_or_else(too_large)
    }
}

impl fmt::Display for Amount {
    /// Writes the exact human-scale value with trailing zeros removed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.whole_tokens();
        let frac = self.fractional_base_units();
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{:09}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(units) => Ok(Self(units)),
            Repr::Text(text) => text
                .trim()
                .parse::<u64>()
                .map(Self)
                .map_err(|e| serde::de::Error::custom(format!("invalid base-unit amount {text:?}: {e}"))),
        }
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({} = {} base units)", self, self.0)
    }
}
