//! Transaction construction.
//!
//! This module provides the [`TransactionIntent`] model, the coin aggregator
//! that turns fragmented holdings into an exact payment, and one builder per
//! marketplace entry function on [`PackageTarget`].

mod builders;
mod coin;
mod intent;

pub use builders::{NewLecture, PackageTarget, functions};
pub use coin::{PaymentFragment, coalesce};
pub use intent::{
    Argument, CallArg, Command, INTENT_JSON_VERSION, MAX_INTENT_ENTRIES, MoveCall,
    TransactionIntent,
};
