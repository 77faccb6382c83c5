//! Network configuration for the Suitudy SDK.
//!
//! A [`SuitudyConfig`] names the ledger network, the JSON-RPC endpoint used
//! for queries and the deployed marketplace program (package and bank ids).

use crate::error::{SuitudyError, SuitudyResult};
use crate::retry::RetryConfig;
use crate::transaction::PackageTarget;
use crate::types::ObjectId;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Package id of the marketplace program deployed on testnet.
pub const TESTNET_PACKAGE_ID: &str =
    "0x16ba7420e7edc4d770bfe01e942d7e13f14339f005014e6ac8eec5a4f41b651c";

/// Bank object id of the marketplace program deployed on testnet.
pub const TESTNET_BANK_ID: &str =
    "0xfeb7c7ed27c56847ee88c3f749034bbae57d2f1e4ca9ce5e63da52ef585726a3";

/// Known ledger networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Mainnet
    Mainnet,
    /// Testnet
    Testnet,
    /// Devnet
    Devnet,
    /// Local development network
    Local,
    /// Custom endpoint
    Custom,
}

impl Network {
    /// Returns the network identifier passed to sponsor services.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "localnet",
            Network::Custom => "custom",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = SuitudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "local" | "localnet" => Ok(Network::Local),
            "custom" => Ok(Network::Custom),
            other => Err(SuitudyError::Config(format!("unknown network: {other}"))),
        }
    }
}

/// Configuration for the ledger client and the marketplace target.
///
/// # Example
///
/// ```rust
/// use suitudy_sdk::SuitudyConfig;
/// use suitudy_sdk::retry::RetryConfig;
///
/// let config = SuitudyConfig::testnet()
///     .with_timeout(std::time::Duration::from_secs(10))
///     .with_retry(RetryConfig::aggressive());
/// assert!(config.package_target().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SuitudyConfig {
    pub(crate) network: Network,
    pub(crate) rpc_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) retry_config: RetryConfig,
    pub(crate) package_id: Option<ObjectId>,
    pub(crate) bank_id: Option<ObjectId>,
}

impl Default for SuitudyConfig {
    fn default() -> Self {
        Self::testnet()
    }
}

impl SuitudyConfig {
    fn preset(network: Network, rpc_url: &'static str, retry_config: RetryConfig) -> Self {
        Self {
            network,
            rpc_url: Url::parse(rpc_url).expect("valid preset URL"),
            timeout: Duration::from_secs(30),
            retry_config,
            package_id: None,
            bank_id: None,
        }
    }

    /// Mainnet. The marketplace is not deployed there, so package and bank
    /// ids must be supplied.
    pub fn mainnet() -> Self {
        Self::preset(
            Network::Mainnet,
            "https://fullnode.mainnet.sui.io:443",
            RetryConfig::conservative(),
        )
    }

    /// Testnet, with the deployed marketplace ids.
    pub fn testnet() -> Self {
        Self::preset(
            Network::Testnet,
            "https://fullnode.testnet.sui.io:443",
            RetryConfig::default(),
        )
        .with_package_id(TESTNET_PACKAGE_ID)
        .with_bank_id(TESTNET_BANK_ID)
    }

    /// Devnet.
    pub fn devnet() -> Self {
        Self::preset(
            Network::Devnet,
            "https://fullnode.devnet.sui.io:443",
            RetryConfig::default(),
        )
    }

    /// A local node on the default port.
    pub fn local() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            ..Self::preset(Network::Local, "http://127.0.0.1:9000", RetryConfig::aggressive())
        }
    }

    /// A custom JSON-RPC endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `rpc_url` is not a valid URL.
    pub fn custom(rpc_url: &str) -> SuitudyResult<Self> {
        Ok(Self {
            network: Network::Custom,
            rpc_url: Url::parse(rpc_url)?,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
            package_id: None,
            bank_id: None,
        })
    }

    /// Returns the preset for `network`. `Custom` falls back to testnet
    /// endpoints until a URL is set with [`with_rpc_url`](Self::with_rpc_url).
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::mainnet(),
            Network::Testnet => Self::testnet(),
            Network::Devnet => Self::devnet(),
            Network::Local => Self::local(),
            Network::Custom => Self {
                network: Network::Custom,
                ..Self::testnet()
            },
        }
    }

    /// Sets the JSON-RPC endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not a valid URL.
    pub fn with_rpc_url(mut self, url: &str) -> SuitudyResult<Self> {
        self.rpc_url = Url::parse(url)?;
        Ok(self)
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy for queries.
    pub fn with_retry(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Disables query retries.
    pub fn without_retry(mut self) -> Self {
        self.retry_config = RetryConfig::no_retry();
        self
    }

    /// Sets the marketplace package id.
    pub fn with_package_id(mut self, package_id: impl Into<ObjectId>) -> Self {
        self.package_id = Some(package_id.into());
        self
    }

    /// Sets the marketplace bank id.
    pub fn with_bank_id(mut self, bank_id: impl Into<ObjectId>) -> Self {
        self.bank_id = Some(bank_id.into());
        self
    }

    /// Returns the network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the JSON-RPC endpoint.
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// Returns the marketplace package id, if configured.
    pub fn package_id(&self) -> Option<&ObjectId> {
        self.package_id.as_ref()
    }

    /// Returns the marketplace bank id, if configured.
    pub fn bank_id(&self) -> Option<&ObjectId> {
        self.bank_id.as_ref()
    }

    /// Returns the builder target for the configured program.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::Config`] if the package or bank id is missing.
    pub fn package_target(&self) -> SuitudyResult<PackageTarget> {
        let package_id = self.package_id.clone().ok_or_else(|| {
            SuitudyError::Config(format!("no package id configured for {}", self.network))
        })?;
        let bank_id = self.bank_id.clone().ok_or_else(|| {
            SuitudyError::Config(format!("no bank id configured for {}", self.network))
        })?;
        Ok(PackageTarget::new(package_id, bank_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testnet_config() {
        let config = SuitudyConfig::testnet();
        assert_eq!(config.network(), Network::Testnet);
        assert_eq!(config.rpc_url().as_str(), "https://fullnode.testnet.sui.io/");

        let target = config.package_target().unwrap();
        assert_eq!(target.package_id.as_str(), TESTNET_PACKAGE_ID);
        assert_eq!(target.bank_id.as_str(), TESTNET_BANK_ID);
    }

    #[test]
    fn test_mainnet_requires_ids() {
        let err = SuitudyConfig::mainnet().package_target().unwrap_err();
        assert!(matches!(err, SuitudyError::Config(ref m) if m.contains("mainnet")));

        let target = SuitudyConfig::mainnet()
            .with_package_id("0xp")
            .with_bank_id("0xb")
            .package_target()
            .unwrap();
        assert_eq!(target, PackageTarget::new("0xp", "0xb"));
    }

    #[test]
    fn test_custom_config() {
        let config = SuitudyConfig::custom("http://node.example.com:9000").unwrap();
        assert_eq!(config.network(), Network::Custom);
        assert!(SuitudyConfig::custom("not a url").is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = SuitudyConfig::devnet()
            .with_timeout(Duration::from_secs(5))
            .without_retry()
            .with_rpc_url("http://127.0.0.1:1234")
            .unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.retry_config().max_retries, 0);
        assert_eq!(config.rpc_url().port(), Some(1234));
        assert_eq!(config.network(), Network::Devnet);
    }

    #[test]
    fn test_network_parsing() {
        assert_eq!("Testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("localnet".parse::<Network>().unwrap(), Network::Local);
        assert!("moonnet".parse::<Network>().is_err());
        assert_eq!(Network::Testnet.to_string(), "testnet");
    }

    #[test]
    fn test_local_retry_defaults() {
        let local = SuitudyConfig::local();
        assert_eq!(local.retry_config().max_retries, 5);
        assert_eq!(local.timeout(), Duration::from_secs(10));
    }
}
