//! Coin holdings owned by an account.

use crate::types::{Amount, ObjectId};
use serde::{Deserialize, Serialize};

/// One coin object owned by the caller's account.
///
/// An account usually holds several coins of the same type; the coin
/// aggregator merges them before carving out a payment. The shape matches
/// the entries of a `suix_getCoins` page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinHolding {
    /// The coin object's id.
    pub coin_object_id: ObjectId,
    /// Balance in base units.
    pub balance: Amount,
    /// Fully-qualified coin type, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_type: Option<String>,
    /// Object version, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Object digest, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl CoinHolding {
    /// Creates a holding from an id and a balance.
    pub fn new(coin_object_id: impl Into<ObjectId>, balance: Amount) -> Self {
        Self {
            coin_object_id: coin_object_id.into(),
            balance,
            coin_type: None,
            version: None,
            digest: None,
        }
    }
}

/// Sums the balances of `holdings`, returning `None` on overflow.
pub fn total_balance(holdings: &[CoinHolding]) -> Option<Amount> {
    holdings
        .iter()
        .try_fold(Amount::ZERO, |acc, coin| acc.checked_add(coin.balance))
}
