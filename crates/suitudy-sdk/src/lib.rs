//! # Suitudy SDK
//!
//! Transaction construction and execution for the Suitudy lecture
//! marketplace: an on-chain utility token (`SUITUDY`) and lectures gated by
//! an access pass (`LecturePass`).
//!
//! The SDK builds transactions out of the caller's fragmented coin holdings
//! and routes them through one of two signing paths: the connected wallet,
//! or a sponsor service for accounts controlled by an ephemeral OAuth key.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use suitudy_sdk::{SuitudyConfig, api::LedgerClient, marketplace::Marketplace};
//! use suitudy_sdk::execution::{ExecutionContext, TransactionExecutor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SuitudyConfig::testnet();
//!     let target = config.package_target()?;
//!     let client = Arc::new(LedgerClient::new(config)?);
//!     let marketplace = Marketplace::new(client.clone(), target.package_id.clone());
//!
//!     let session = state.current()?;
//!     let holdings = marketplace.token_holdings(session.address()).await?;
//!     let intent = target.buy_lecture(&lecture_id, "25".parse()?, &holdings)?;
//!
//!     let executor = TransactionExecutor::new(ExecutionContext::new(client), wallet, sponsor);
//!     let result = executor.execute(&intent, &session).await?;
//!     println!("{}", result.response.digest);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Ids, exact amounts and coin holdings
//! - [`transaction`] - Transaction intents, coin aggregation and builders
//! - [`session`] - Authentication sessions
//! - [`execution`] - Routing to the wallet or the sponsor service
//! - [`api`] - JSON-RPC ledger queries
//! - [`marketplace`] - Listings, passes and token balances

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod api;
pub mod config;
pub mod error;
pub mod execution;
pub mod marketplace;
pub mod retry;
pub mod session;
pub mod transaction;
pub mod types;

pub use config::{Network, SuitudyConfig};
pub use error::{SuitudyError, SuitudyResult};
pub use execution::{ExecutionPath, ExecutionResult, TransactionExecutor};
pub use session::{AuthSession, SessionState};
pub use transaction::{PackageTarget, TransactionIntent};
pub use types::{Amount, CoinHolding, ObjectId, SuiAddress};
