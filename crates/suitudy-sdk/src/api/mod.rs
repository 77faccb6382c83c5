//! Ledger query API.
//!
//! - [`LedgerClient`] - JSON-RPC client for coins, balances, owned objects
//!   and events
//! - [`response`] - typed JSON-RPC results

mod rpc;
pub mod response;

pub use response::{Balance, EventId, ObjectContent, ObjectData, ObjectResponse, Page, SuiEvent};
pub use rpc::{LedgerClient, MAX_OBJECTS_PER_REQUEST};
