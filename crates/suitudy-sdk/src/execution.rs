//! Transaction execution.
//!
//! The [`TransactionExecutor`] routes a built [`TransactionIntent`] through
//! exactly one of two capabilities, chosen from the session it is given:
//!
//! - [`AuthSession::Sponsored`] goes to the [`SponsorService`], which pays
//!   the fees and broadcasts on behalf of the ephemeral-key account.
//! - [`AuthSession::Standard`] goes to the connected [`WalletSigner`], which
//!   signs and pays for itself.
//!
//! Each call performs one submission. Failures are wrapped in
//! [`SuitudyError::ExecutionFailed`] and are never retried here: the intent
//! may reference coin objects that a partially processed submission already
//! consumed, so callers rebuild the intent before trying again.
//!
//! # Example
//!
//! ```rust,ignore
//! let executor = TransactionExecutor::new(context, wallet, sponsor);
//! let session = state.current()?;
//! let intent = target.buy_lecture(&lecture_id, price, &holdings)?;
//! let result = executor.execute(&intent, &session).await?;
//! println!("{} via {}", result.response.digest, result.path);
//! ```

use crate::api::LedgerClient;
use crate::config::Network;
use crate::error::{SuitudyError, SuitudyResult};
use crate::session::{AuthSession, EphemeralKeypair};
use crate::transaction::TransactionIntent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// The signing path a transaction was routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPath {
    /// Signed and paid for by the connected wallet.
    Standard,
    /// Paid for and broadcast by the sponsor service.
    Sponsored,
}

impl fmt::Display for ExecutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPath::Standard => f.write_str("wallet signature"),
            ExecutionPath::Sponsored => f.write_str("sponsored execution"),
        }
    }
}

/// What the network reported for an executed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Transaction digest.
    pub digest: String,
    /// Raw effects, when the executing service returns them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<serde_json::Value>,
}

/// The normalized result of [`TransactionExecutor::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// The path the transaction took.
    pub path: ExecutionPath,
    /// The network's response.
    pub response: TransactionResponse,
}

/// A connected wallet's sign-and-execute entry point.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Signs `intent` with the wallet's key and submits it.
    async fn sign_and_execute(&self, intent: &TransactionIntent) -> anyhow::Result<TransactionResponse>;
}

/// Everything a sponsor service needs to execute one transaction.
#[derive(Clone, Copy)]
pub struct SponsorRequest<'a> {
    /// The transaction to sponsor.
    pub intent: &'a TransactionIntent,
    /// Target network identifier.
    pub network: Network,
    /// Handle to the ledger client.
    pub client: &'a LedgerClient,
    /// The ephemeral key that controls the sender.
    pub keypair: &'a dyn EphemeralKeypair,
}

impl fmt::Debug for SponsorRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SponsorRequest")
            .field("commands", &self.intent.commands().len())
            .field("network", &self.network)
            .field("sender", &self.keypair.address())
            .finish()
    }
}

/// A sponsor service that pays fees and broadcasts for ephemeral-key accounts.
#[async_trait]
pub trait SponsorService: Send + Sync {
    /// Sponsors, signs and broadcasts `request.intent`.
    async fn sponsor_and_execute(
        &self,
        request: SponsorRequest<'_>,
    ) -> anyhow::Result<TransactionResponse>;
}

/// The network context threaded into every execution.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Target network.
    pub network: Network,
    /// Ledger client handed to the sponsor service.
    pub client: Arc<LedgerClient>,
}

impl ExecutionContext {
    /// Creates a context for `client`'s network.
    pub fn new(client: Arc<LedgerClient>) -> Self {
        Self {
            network: client.network(),
            client,
        }
    }
}

/// Routes transactions to the wallet or the sponsor service.
pub struct TransactionExecutor {
    context: ExecutionContext,
    wallet: Arc<dyn WalletSigner>,
    sponsor: Arc<dyn SponsorService>,
}

impl fmt::Debug for TransactionExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionExecutor")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl TransactionExecutor {
    /// Creates an executor over the given capabilities.
    pub fn new(
        context: ExecutionContext,
        wallet: Arc<dyn WalletSigner>,
        sponsor: Arc<dyn SponsorService>,
    ) -> Self {
        Self {
            context,
            wallet,
            sponsor,
        }
    }

    /// Returns the execution context.
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Executes `intent` for `session`.
    ///
    /// The path is chosen from `session` on every call. Exactly one
    /// submission is made.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::ExecutionFailed`] wrapping whatever the wallet
    /// or the sponsor service reported.
    pub async fn execute(
        &self,
        intent: &TransactionIntent,
        session: &AuthSession,
    ) -> SuitudyResult<ExecutionResult> {
        let path = session.path();
        info!(
            path = %path,
            sender = %session.address().to_short_string(),
            commands = intent.commands().len(),
            "Executing transaction"
        );

        let outcome = match session {
            AuthSession::Sponsored { keypair, .. } => {
                let request = SponsorRequest {
                    intent,
                    network: self.context.network,
                    client: &self.context.client,
                    keypair: keypair.as_ref(),
                };
                self.sponsor.sponsor_and_execute(request).await
            }
            AuthSession::Standard { .. } => self.wallet.sign_and_execute(intent).await,
        };

        match outcome {
            Ok(response) => {
                info!(path = %path, digest = %response.digest, "Transaction executed");
                Ok(ExecutionResult { path, response })
            }
            Err(cause) => {
                let error = SuitudyError::execution_failed(path, cause);
                warn!(path = %path, error = %error.sanitized_message(), "Transaction failed");
                Err(error)
            }
        }
    }

    /// Executes `intent` for the current session of `state`.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::NotConnected`] if nobody is connected, or
    /// [`SuitudyError::ExecutionFailed`] as for [`execute`](Self::execute).
    pub async fn execute_current(
        &self,
        intent: &TransactionIntent,
        state: &crate::session::SessionState,
    ) -> SuitudyResult<ExecutionResult> {
        let session = state.current()?;
        self.execute(intent, &session).await
    }
}
