//! Authentication sessions.
//!
//! An [`AuthSession`] records which account is active and which mechanism
//! produced it. The mechanism is decided once, when the session is
//! established: if the ephemeral-key provider holds a keypair whose address
//! is the connected account, the session is [`AuthSession::Sponsored`];
//! otherwise it is [`AuthSession::Standard`]. The executor only matches on
//! the variant.
//!
//! [`SessionState`] holds the current session and implements connect, login
//! and logout. Callers take an `Arc` snapshot for each execution, so a
//! logout in the middle of a submission does not affect it.

use crate::error::{SuitudyError, SuitudyResult};
use crate::execution::ExecutionPath;
use crate::types::SuiAddress;
use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// An ephemeral keypair issued through an OAuth key exchange.
///
/// Signing stays with the sponsor service; the SDK only needs the address
/// the key controls.
pub trait EphemeralKeypair: Send + Sync + fmt::Debug {
    /// Returns the account address derived from the key.
    fn address(&self) -> SuiAddress;
}

/// Source of the current ephemeral keypair (for example an OAuth login flow).
#[async_trait]
pub trait EphemeralKeyProvider: Send + Sync {
    /// Returns the keypair of the logged-in user, or `None` if nobody is
    /// logged in through this provider.
    async fn keypair(&self) -> anyhow::Result<Option<Arc<dyn EphemeralKeypair>>>;
}

/// The active account and the mechanism that authenticated it.
#[derive(Clone, Debug)]
pub enum AuthSession {
    /// A wallet that signs with its own persistent key.
    Standard {
        /// The connected account.
        address: SuiAddress,
    },
    /// An account controlled by an ephemeral key; fees are sponsored.
    Sponsored {
        /// The connected account.
        address: SuiAddress,
        /// The ephemeral key controlling `address`.
        keypair: Arc<dyn EphemeralKeypair>,
    },
}

impl AuthSession {
    /// A session for a wallet that signs for itself.
    pub fn standard(address: SuiAddress) -> Self {
        AuthSession::Standard { address }
    }

    /// A session for the account controlled by `keypair`.
    pub fn sponsored(keypair: Arc<dyn EphemeralKeypair>) -> Self {
        AuthSession::Sponsored {
            address: keypair.address(),
            keypair,
        }
    }

    /// Establishes the session for `account`.
    ///
    /// The provider is asked for its keypair once. A keypair controlling
    /// `account` yields a sponsored session; anything else, including a
    /// provider failure, yields a standard one.
    pub async fn establish(
        account: SuiAddress,
        provider: Option<&dyn EphemeralKeyProvider>,
    ) -> Self {
        let Some(provider) = provider else {
            return Self::standard(account);
        };

        match provider.keypair().await {
            Ok(Some(keypair)) if keypair.address() == account => {
                debug!(address = %account, "Ephemeral key controls the connected account");
                AuthSession::Sponsored {
                    address: account,
                    keypair,
                }
            }
            Ok(_) => Self::standard(account),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Ephemeral key lookup failed, using wallet signing");
                Self::standard(account)
            }
        }
    }

    /// Returns the active account.
    pub fn address(&self) -> &SuiAddress {
        match self {
            AuthSession::Standard { address } | AuthSession::Sponsored { address, .. } => address,
        }
    }

    /// Returns the execution path this session routes through.
    pub fn path(&self) -> ExecutionPath {
        match self {
            AuthSession::Standard { .. } => ExecutionPath::Standard,
            AuthSession::Sponsored { .. } => ExecutionPath::Sponsored,
        }
    }

    /// Returns true for ephemeral-key sessions.
    pub fn is_sponsored(&self) -> bool {
        matches!(self, AuthSession::Sponsored { .. })
    }
}

/// Holder of the current session.
#[derive(Debug, Default)]
pub struct SessionState {
    current: RwLock<Option<Arc<AuthSession>>>,
}

impl SessionState {
    /// Creates an empty state (nobody connected).
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a wallet account, consulting `provider` to detect an
    /// ephemeral-key wallet.
    ///
    /// If the provider fails, the account is connected as a standard
    /// session and its transactions go to the wallet for signing, even when
    /// the account is in fact controlled by an ephemeral key.
    pub async fn connect(
        &self,
        account: SuiAddress,
        provider: Option<&dyn EphemeralKeyProvider>,
    ) -> Arc<AuthSession> {
        let session = Arc::new(AuthSession::establish(account, provider).await);
        info!(
            address = %session.address().to_short_string(),
            path = %session.path(),
            "Connected account"
        );
        self.replace(Some(session.clone()));
        session
    }

    /// Logs in through an ephemeral-key provider.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::NotConnected`] if the provider has no keypair
    /// and [`SuitudyError::Internal`] if the provider fails.
    pub async fn login(&self, provider: &dyn EphemeralKeyProvider) -> SuitudyResult<Arc<AuthSession>> {
        let keypair = provider
            .keypair()
            .await
            .map_err(|e| SuitudyError::Internal(format!("ephemeral key lookup failed: {e:#}")))?
            .ok_or(SuitudyError::NotConnected)?;

        let session = Arc::new(AuthSession::sponsored(keypair));
        info!(
            address = %session.address().to_short_string(),
            "Logged in with ephemeral key"
        );
        self.replace(Some(session.clone()));
        Ok(session)
    }

    /// Clears the current session.
    pub fn logout(&self) {
        if self.replace(None).is_some() {
            info!("Logged out");
        }
    }

    /// Returns a snapshot of the current session.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::NotConnected`] if nobody is connected.
    pub fn current(&self) -> SuitudyResult<Arc<AuthSession>> {
        self.snapshot().ok_or(SuitudyError::NotConnected)
    }

    /// Returns a snapshot of the current session, if any.
    pub fn snapshot(&self) -> Option<Arc<AuthSession>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, session: Option<Arc<AuthSession>>) -> Option<Arc<AuthSession>> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, session)
    }
}
