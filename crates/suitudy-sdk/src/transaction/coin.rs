//! Coin aggregation: turning fragmented holdings into one exact payment.

use crate::error::{SuitudyError, SuitudyResult};
use crate::transaction::{Argument, TransactionIntent};
use crate::types::{Amount, CoinHolding, ObjectId, TOKEN_STRUCT, total_balance};
use tracing::debug;

/// A coin of exact value carved out of the caller's holdings.
///
/// The fragment only exists inside the transaction it was built into; its
/// [`argument`](Self::argument) is meant to be passed straight to a Move call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentFragment {
    /// Handle to the split-off coin.
    pub argument: Argument,
    /// The exact value of the fragment.
    pub amount: Amount,
    /// The holding that absorbed the others and keeps the remainder.
    pub accumulator: ObjectId,
    /// What should remain on the accumulator, when the supplied holdings
    /// cover the amount. `None` means the ledger will reject the call.
    pub expected_remainder: Option<Amount>,
}

/// Merges `holdings` into the first one and splits exactly `amount` off it.
///
/// The first holding is the accumulator. When more than one holding is given,
/// a single `MergeCoins` command folds the rest into it in input order. A
/// `SplitCoins` command then carves out the payment.
///
/// Sufficiency is not checked here beyond non-emptiness; an under-funded
/// payment is rejected by the ledger program at execution time.
///
/// # Errors
///
/// Returns [`SuitudyError::InsufficientFunds`] when `holdings` is empty, and
/// [`SuitudyError::InvalidInput`] when the holdings and the amount do not fit
/// in the intent's remaining input slots. In both cases nothing is appended to
/// `intent`.
pub fn coalesce(
    intent: &mut TransactionIntent,
    holdings: &[CoinHolding],
    amount: Amount,
) -> SuitudyResult<PaymentFragment> {
    let Some((primary, rest)) = holdings.split_first() else {
        return Err(SuitudyError::InsufficientFunds {
            coin_type: TOKEN_STRUCT.to_string(),
        });
    };

    // One slot for the amount plus one per holding.
    if holdings.len() >= intent.remaining_inputs() {
        return Err(SuitudyError::invalid_input(format!(
            "cannot merge {} coins into one transaction",
            holdings.len()
        )));
    }

    // Encode first so a failure leaves the intent untouched.
    let amount_arg = intent.pure(&amount.base_units())?;
    let accumulator = intent.object(&primary.coin_object_id)?;

    if !rest.is_empty() {
        let sources = rest
            .iter()
            .map(|coin| intent.object(&coin.coin_object_id))
            .collect::<SuitudyResult<Vec<_>>>()?;
        intent.merge_coins(accumulator, sources);
    }

    let split = intent.split_coins(accumulator, [amount_arg])?;
    let argument = split
        .first()
        .copied()
        .ok_or_else(|| SuitudyError::Internal("split produced no coin".to_string()))?;

    let expected_remainder = total_balance(holdings).and_then(|total| total.checked_sub(amount));

    debug!(
        accumulator = %primary.coin_object_id,
        merged = rest.len(),
        amount = amount.base_units(),
        remainder = ?expected_remainder.map(|r| r.base_units()),
        "Coalesced coin holdings"
    );

    Ok(PaymentFragment {
        argument,
        amount,
        accumulator: primary.coin_object_id.clone(),
        expected_remainder,
    })
}
