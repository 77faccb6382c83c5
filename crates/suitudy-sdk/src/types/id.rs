//! Opaque identifier handles.
//!
//! Object ids (lectures, passes, the bank, the package) and account addresses
//! are supplied by the caller or the ledger. Object ids pass through to
//! transactions unchanged; addresses are put in canonical form so that
//! equality does not depend on how a source wrote them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle for an on-chain object (coin, lecture, pass, bank or package).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Creates an object id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the handle is empty.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Number of hex digits in a canonical account address.
pub const ADDRESS_HEX_LENGTH: usize = 64;

/// An account address as reported by a wallet or derived from a key.
///
/// Hex addresses are stored in canonical form: lower-cased, `0x`-prefixed
/// and left-padded with zeros to 64 digits, so `0xB0B` and
/// `0x0000...0b0b` name the same account. Strings that are not hex
/// addresses are kept trimmed and lower-cased.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SuiAddress(String);

impl SuiAddress {
    /// Creates an address, normalizing it to canonical form.
    pub fn new(address: impl AsRef<str>) -> Self {
        let lower = address.as_ref().trim().to_ascii_lowercase();
        let digits = lower.strip_prefix("0x").unwrap_or(&lower);
        let is_hex = !digits.is_empty()
            && digits.len() <= ADDRESS_HEX_LENGTH
            && digits.bytes().all(|b| b.is_ascii_hexdigit());
        if !is_hex {
            return Self(lower);
        }
        Self(format!("0x{digits:0>width$}", width = ADDRESS_HEX_LENGTH))
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a shortened form for display: leading zeros are dropped and
    /// long addresses are elided, e.g. `0x1`, `0xb0b` or `0x1234...cdef`.
    pub fn to_short_string(&self) -> String {
        let Some(digits) = self.0.strip_prefix("0x") else {
            return self.0.clone();
        };
        if !digits.is_ascii() {
            return self.0.clone();
        }
        let trimmed = digits.trim_start_matches('0');
        let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
        if trimmed.len() <= 8 {
            return format!("0x{trimmed}");
        }
        format!("0x{}...{}", &trimmed[..4], &trimmed[trimmed.len() - 4..])
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self.0)
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SuiAddress {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for SuiAddress {
    fn from(address: String) -> Self {
        Self::new(address)
    }
}

impl From<SuiAddress> for String {
    fn from(address: SuiAddress) -> Self {
        address.0
    }
}
