//! Builders for the marketplace program's entry functions.
//!
//! Every builder is a pure function from a [`PackageTarget`] and domain
//! arguments to a complete [`TransactionIntent`]. Builders never talk to the
//! network; the result is handed to a
//! [`TransactionExecutor`](crate::execution::TransactionExecutor).
//!
//! # Example
//!
//! ```rust
//! use suitudy_sdk::transaction::PackageTarget;
//! use suitudy_sdk::types::{Amount, CoinHolding};
//!
//! let target = PackageTarget::new("0x16ba", "0xfeb7");
//! let holdings = vec![
//!     CoinHolding::new("c1", "30".parse().unwrap()),
//!     CoinHolding::new("c2", "40".parse().unwrap()),
//! ];
//! let price: Amount = "50".parse().unwrap();
//!
//! let intent = target.sell_token(price, &holdings).unwrap();
//! // merge, split, then the call itself
//! assert_eq!(intent.commands().len(), 3);
//! ```

use crate::error::{SuitudyError, SuitudyResult};
use crate::transaction::coin::coalesce;
use crate::transaction::{Argument, MoveCall, TransactionIntent};
use crate::types::{Amount, CoinHolding, MARKETPLACE_MODULE, ObjectId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Entry function names of the marketplace program.
pub mod functions {
    /// `buy_token(bank, payment)`
    pub const BUY_TOKEN: &str = "buy_token";
    /// `sell_token(bank, payment)`
    pub const SELL_TOKEN: &str = "sell_token";
    /// `list_lecture(title, description, image_url, content_url, price)`
    pub const LIST_LECTURE: &str = "list_lecture";
    /// `buy_lecture(lecture, payment)`
    pub const BUY_LECTURE: &str = "buy_lecture";
    /// `delete_lecture(lecture)`
    pub const DELETE_LECTURE: &str = "delete_lecture";
    /// `burn_pass(pass)`
    pub const BURN_PASS: &str = "burn_pass";
}

/// The deployed marketplace program and its token bank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageTarget {
    /// Package that publishes the `suitudy` module.
    pub package_id: ObjectId,
    /// Shared bank object that mints and redeems tokens.
    pub bank_id: ObjectId,
}

/// The fields of a new lecture listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLecture {
    /// Lecture title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Cover image URL.
    pub image_url: String,
    /// URL of the gated content.
    pub content_url: String,
    /// Price in tokens.
    pub price: Amount,
}

impl NewLecture {
    /// Creates a listing, rejecting empty required fields.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::InvalidInput`] naming the first empty field.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
        content_url: impl Into<String>,
        price: Amount,
    ) -> SuitudyResult<Self> {
        let lecture = Self {
            title: title.into(),
            description: description.into(),
            image_url: image_url.into(),
            content_url: content_url.into(),
            price,
        };
        lecture.validate()?;
        Ok(lecture)
    }

    /// Checks that every required field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::InvalidInput`] naming the first empty field.
    pub fn validate(&self) -> SuitudyResult<()> {
        let fields = [
            ("title", &self.title),
            ("description", &self.description),
            ("image_url", &self.image_url),
            ("content_url", &self.content_url),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(SuitudyError::invalid_input(format!("{name} is required")));
            }
        }
        Ok(())
    }
}

impl PackageTarget {
    /// Creates a target from a package id and a bank id.
    pub fn new(package_id: impl Into<ObjectId>, bank_id: impl Into<ObjectId>) -> Self {
        Self {
            package_id: package_id.into(),
            bank_id: bank_id.into(),
        }
    }

    fn call(&self, function: &str, arguments: Vec<Argument>) -> MoveCall {
        MoveCall::new(
            self.package_id.clone(),
            MARKETPLACE_MODULE,
            function,
            arguments,
        )
    }

    /// Buys tokens with SUI split off the gas coin.
    ///
    /// # Errors
    ///
    /// Fails only if the amount cannot be encoded.
    pub fn buy_token(&self, sui_amount: Amount) -> SuitudyResult<TransactionIntent> {
        let mut tx = TransactionIntent::new();
        let amount = tx.pure(&sui_amount.base_units())?;
        let gas = tx.gas();
        let payment = tx.split_coins(gas, [amount])?[0];
        let bank = tx.object(&self.bank_id)?;
        tx.move_call(self.call(functions::BUY_TOKEN, vec![bank, payment]))?;

        debug!(amount = sui_amount.base_units(), "Built buy_token transaction");
        Ok(tx)
    }

    /// Sells `amount` tokens back to the bank, paying from `holdings`.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::InsufficientFunds`] if `holdings` is empty, or
    /// [`SuitudyError::InvalidInput`] if there are too many to merge.
    pub fn sell_token(
        &self,
        amount: Amount,
        holdings: &[CoinHolding],
    ) -> SuitudyResult<TransactionIntent> {
        let mut tx = TransactionIntent::new();
        let payment = coalesce(&mut tx, holdings, amount)?;
        let bank = tx.object(&self.bank_id)?;
        tx.move_call(self.call(functions::SELL_TOKEN, vec![bank, payment.argument]))?;

        debug!(
            amount = amount.base_units(),
            holdings = holdings.len(),
            "Built sell_token transaction"
        );
        Ok(tx)
    }

    /// Lists a new lecture for sale.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::InvalidInput`] if a required field is empty.
    pub fn list_lecture(&self, lecture: &NewLecture) -> SuitudyResult<TransactionIntent> {
        lecture.validate()?;

        let mut tx = TransactionIntent::new();
        let arguments = vec![
            tx.pure(lecture.title.as_str())?,
            tx.pure(lecture.description.as_str())?,
            tx.pure(lecture.image_url.as_str())?,
            tx.pure(lecture.content_url.as_str())?,
            tx.pure(&lecture.price.base_units())?,
        ];
        tx.move_call(self.call(functions::LIST_LECTURE, arguments))?;

        debug!(
            title = %lecture.title,
            price = lecture.price.base_units(),
            "Built list_lecture transaction"
        );
        Ok(tx)
    }

    /// Buys access to a lecture, paying `price` from `holdings`.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::InsufficientFunds`] if `holdings` is empty, or
    /// [`SuitudyError::InvalidInput`] if there are too many to merge.
    pub fn buy_lecture(
        &self,
        lecture_id: &ObjectId,
        price: Amount,
        holdings: &[CoinHolding],
    ) -> SuitudyResult<TransactionIntent> {
        let mut tx = TransactionIntent::new();
        let payment = coalesce(&mut tx, holdings, price)?;
        let lecture = tx.object(lecture_id)?;
        tx.move_call(self.call(functions::BUY_LECTURE, vec![lecture, payment.argument]))?;

        debug!(
            lecture = %lecture_id,
            price = price.base_units(),
            "Built buy_lecture transaction"
        );
        Ok(tx)
    }

    /// Deletes a lecture the caller listed.
    ///
    /// # Errors
    ///
    /// Fails only if the intent cannot address its input.
    pub fn delete_lecture(&self, lecture_id: &ObjectId) -> SuitudyResult<TransactionIntent> {
        let mut tx = TransactionIntent::new();
        let lecture = tx.object(lecture_id)?;
        tx.move_call(self.call(functions::DELETE_LECTURE, vec![lecture]))?;
        debug!(lecture = %lecture_id, "Built delete_lecture transaction");
        Ok(tx)
    }

    /// Burns a lecture pass the caller owns.
    ///
    /// # Errors
    ///
    /// Fails only if the intent cannot address its input.
    pub fn burn_pass(&self, pass_id: &ObjectId) -> SuitudyResult<TransactionIntent> {
        let mut tx = TransactionIntent::new();
        let pass = tx.object(pass_id)?;
        tx.move_call(self.call(functions::BURN_PASS, vec![pass]))?;
        debug!(pass = %pass_id, "Built burn_pass transaction");
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{CallArg, Command};

    fn target() -> PackageTarget {
        PackageTarget::new("0xpkg", "0xbank")
    }

    fn tokens(n: u64) -> Amount {
        Amount::from_tokens(n).unwrap()
    }

    fn only_call(tx: &TransactionIntent) -> &MoveCall {
        let calls: Vec<&MoveCall> = tx.move_calls().collect();
        assert_eq!(calls.len(), 1, "expected exactly one move call");
        calls[0]
    }

    fn pure_u64(tx: &TransactionIntent, arg: Argument) -> u64 {
        bcs::from_bytes(tx.input(arg).unwrap().as_pure().unwrap()).unwrap()
    }

    fn pure_string(tx: &TransactionIntent, arg: Argument) -> String {
        bcs::from_bytes(tx.input(arg).unwrap().as_pure().unwrap()).unwrap()
    }

    fn object(tx: &TransactionIntent, arg: Argument) -> ObjectId {
        tx.input(arg).unwrap().as_object().unwrap().clone()
    }

    #[test]
    fn test_buy_token_splits_gas() {
        let tx = target().buy_token("1.5".parse().unwrap()).unwrap();

        let Command::SplitCoins { coin, amounts } = &tx.commands()[0] else {
            panic!("expected SplitCoins");
        };
        assert_eq!(*coin, Argument::GasCoin);
        assert_eq!(pure_u64(&tx, amounts[0]), 1_500_000_000);

        let call = only_call(&tx);
        assert_eq!(call.target(), "0xpkg::suitudy::buy_token");
        assert_eq!(object(&tx, call.arguments[0]), ObjectId::new("0xbank"));
        assert_eq!(call.arguments[1], Argument::NestedResult(0, 0));
    }

    #[test]
    fn test_sell_token_coalesces_holdings() {
        let holdings = vec![
            CoinHolding::new("c1", tokens(30)),
            CoinHolding::new("c2", tokens(40)),
        ];
        let tx = target().sell_token(tokens(50), &holdings).unwrap();

        assert!(matches!(tx.commands()[0], Command::MergeCoins { .. }));
        assert!(matches!(tx.commands()[1], Command::SplitCoins { .. }));

        let call = only_call(&tx);
        assert_eq!(call.target(), "0xpkg::suitudy::sell_token");
        assert_eq!(object(&tx, call.arguments[0]), ObjectId::new("0xbank"));
        assert_eq!(call.arguments[1], Argument::NestedResult(1, 0));
    }

    #[test]
    fn test_sell_token_without_holdings() {
        let err = target().sell_token(tokens(1), &[]).unwrap_err();
        assert!(matches!(err, SuitudyError::InsufficientFunds { .. }));
        assert_eq!(err.user_message(), "You don't have any SUITUDY tokens");
    }

    #[test]
    fn test_buy_lecture_with_too_many_coins() {
        let holdings: Vec<CoinHolding> = (0..70_000)
            .map(|i| CoinHolding::new(format!("c{i}"), Amount::from_base_units(1)))
            .collect();
        let err = target()
            .buy_lecture(&ObjectId::new("L1"), tokens(1), &holdings)
            .unwrap_err();
        assert!(matches!(err, SuitudyError::InvalidInput(_)));
    }

    #[test]
    fn test_list_lecture_arguments() {
        let lecture = NewLecture::new(
            "Rust 101",
            "Ownership and borrowing",
            "https://img.example/rust.png",
            "https://content.example/rust",
            "12.5".parse().unwrap(),
        )
        .unwrap();
        let tx = target().list_lecture(&lecture).unwrap();

        assert_eq!(tx.commands().len(), 1);
        let call = only_call(&tx);
        assert_eq!(call.function, "list_lecture");
        assert_eq!(call.arguments.len(), 5);
        assert_eq!(pure_string(&tx, call.arguments[0]), "Rust 101");
        assert_eq!(pure_string(&tx, call.arguments[1]), "Ownership and borrowing");
        assert_eq!(pure_string(&tx, call.arguments[2]), "https://img.example/rust.png");
        assert_eq!(pure_string(&tx, call.arguments[3]), "https://content.example/rust");
        assert_eq!(pure_u64(&tx, call.arguments[4]), 12_500_000_000);
    }

    #[test]
    fn test_new_lecture_rejects_empty_fields() {
        let err = NewLecture::new("Rust", "", "img", "content", tokens(1)).unwrap_err();
        assert!(matches!(err, SuitudyError::InvalidInput(ref m) if m.contains("description")));

        let err = NewLecture::new("  ", "desc", "img", "content", tokens(1)).unwrap_err();
        assert!(matches!(err, SuitudyError::InvalidInput(ref m) if m.contains("title")));
    }

    #[test]
    fn test_buy_lecture_single_holding() {
        let holdings = vec![CoinHolding::new("c1", tokens(25))];
        let lecture = ObjectId::new("L1");
        let tx = target().buy_lecture(&lecture, tokens(25), &holdings).unwrap();

        let merges = tx
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::MergeCoins { .. }))
            .count();
        assert_eq!(merges, 0);

        let Command::SplitCoins { coin, amounts } = &tx.commands()[0] else {
            panic!("expected SplitCoins");
        };
        assert_eq!(object(&tx, *coin), ObjectId::new("c1"));
        assert_eq!(amounts.len(), 1);
        assert_eq!(pure_u64(&tx, amounts[0]), 25_000_000_000);

        let call = only_call(&tx);
        assert_eq!(call.target(), "0xpkg::suitudy::buy_lecture");
        assert_eq!(object(&tx, call.arguments[0]), lecture);
        assert_eq!(call.arguments[1], Argument::NestedResult(0, 0));
    }

    #[test]
    fn test_delete_and_burn() {
        let tx = target().delete_lecture(&ObjectId::new("L1")).unwrap();
        let call = only_call(&tx);
        assert_eq!(call.target(), "0xpkg::suitudy::delete_lecture");
        assert_eq!(tx.inputs(), &[CallArg::Object(ObjectId::new("L1"))]);

        let tx = target().burn_pass(&ObjectId::new("P9")).unwrap();
        let call = only_call(&tx);
        assert_eq!(call.target(), "0xpkg::suitudy::burn_pass");
        assert_eq!(object(&tx, call.arguments[0]), ObjectId::new("P9"));
    }
}
