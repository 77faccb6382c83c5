//! Core ledger types used by the SDK.
//!
//! This module contains identifier handles, exact amount arithmetic and
//! the coin holding record returned by the ledger.

mod amount;
mod coin;
mod id;

pub use amount::{Amount, BASE_UNIT_DECIMALS, BASE_UNITS_PER_TOKEN};
pub use coin::{CoinHolding, total_balance};
pub use id::{ADDRESS_HEX_LENGTH, ObjectId, SuiAddress};

/// The Move module name of the marketplace program.
pub const MARKETPLACE_MODULE: &str = "suitudy";

/// The struct name of the marketplace's fungible token.
pub const TOKEN_STRUCT: &str = "SUITUDY";

/// The struct name of the access pass minted on purchase.
pub const LECTURE_PASS_STRUCT: &str = "LecturePass";

/// The event emitted when a lecture is listed.
pub const LECTURE_LISTED_EVENT: &str = "LectureListed";

/// Formats a fully-qualified Move struct type, e.g. `0xabc::suitudy::SUITUDY`.
pub fn struct_type(package_id: &ObjectId, module: &str, name: &str) -> String {
    format!("{}::{}::{}", package_id, module, name)
}

/// Returns the last `::` separated segment of a Move type string.
///
/// Generic parameters are ignored, so `0x2::coin::Coin<0x2::sui::SUI>`
/// yields `Coin`.
pub fn type_name(type_str: &str) -> &str {
    let without_generics = type_str.split('<').next().unwrap_or(type_str);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}
