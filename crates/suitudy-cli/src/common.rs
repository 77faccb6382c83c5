//! Shared types and helpers for the CLI.

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use std::sync::Arc;
use suitudy_sdk::api::LedgerClient;
use suitudy_sdk::marketplace::Marketplace;
use suitudy_sdk::types::ADDRESS_HEX_LENGTH;
use suitudy_sdk::{Amount, CoinHolding, Network, PackageTarget, SuiAddress, SuitudyConfig};

/// Global options available on every command.
#[derive(clap::Args, Debug)]
pub struct GlobalOpts {
    /// Network to connect to
    #[arg(long, global = true, env = "SUITUDY_NETWORK", default_value = "testnet")]
    pub network: NetworkArg,

    /// Custom JSON-RPC URL (overrides the network's endpoint)
    #[arg(long, global = true, env = "SUITUDY_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Marketplace package id (overrides the network preset)
    #[arg(long, global = true, env = "SUITUDY_PACKAGE_ID")]
    pub package_id: Option<String>,

    /// Token bank object id (overrides the network preset)
    #[arg(long, global = true, env = "SUITUDY_BANK_ID")]
    pub bank_id: Option<String>,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported network names.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NetworkArg {
    Mainnet,
    Testnet,
    Devnet,
    Local,
}

impl From<NetworkArg> for Network {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::Mainnet => Network::Mainnet,
            NetworkArg::Testnet => Network::Testnet,
            NetworkArg::Devnet => Network::Devnet,
            NetworkArg::Local => Network::Local,
        }
    }
}

impl GlobalOpts {
    /// Build a `SuitudyConfig` from the global options.
    pub fn build_config(&self) -> Result<SuitudyConfig> {
        let mut config = SuitudyConfig::for_network(self.network.into());
        if let Some(url) = &self.rpc_url {
            config = config.with_rpc_url(url).context("invalid RPC URL")?;
        }
        if let Some(id) = &self.package_id {
            config = config.with_package_id(id.as_str());
        }
        if let Some(id) = &self.bank_id {
            config = config.with_bank_id(id.as_str());
        }
        Ok(config)
    }

    /// Build a ledger client from the global options.
    pub fn build_client(&self) -> Result<Arc<LedgerClient>> {
        let config = self.build_config()?;
        let client = LedgerClient::new(config).context("failed to create ledger client")?;
        Ok(Arc::new(client))
    }

    /// Resolve the marketplace package and bank.
    pub fn package_target(&self) -> Result<PackageTarget> {
        self.build_config()?.package_target().context(
            "no marketplace deployment configured; pass --package-id and --bank-id",
        )
    }

    /// Build a marketplace view over the configured package.
    pub fn marketplace(&self) -> Result<Marketplace> {
        let target = self.package_target()?;
        Ok(Marketplace::new(self.build_client()?, target.package_id))
    }
}

/// Parse an account address.
pub fn parse_address(s: &str) -> Result<SuiAddress> {
    let s = s.trim();
    if !s.starts_with("0x") || s.len() < 3 {
        bail!("invalid address '{s}': expected a 0x-prefixed hex string");
    }
    let digits = &s[2..];
    if digits.len() > ADDRESS_HEX_LENGTH || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("invalid address '{s}': expected a 0x-prefixed hex string");
    }
    Ok(SuiAddress::new(s))
}

/// Resolve an optional `--owner` flag, failing with a hint when it is missing.
pub fn require_address(addr: &Option<String>) -> Result<SuiAddress> {
    match addr {
        Some(s) => parse_address(s),
        None => bail!("No --owner provided. Pass --owner <0x...>."),
    }
}

/// Parse a token amount such as `25` or `0.5`.
pub fn parse_amount(s: &str) -> Result<Amount> {
    s.trim()
        .parse()
        .with_context(|| format!("invalid amount '{s}': expected a number like '25' or '0.5'"))
}

/// Parse a coin holding given as `<coin-object-id>:<amount>`.
pub fn parse_holding(s: &str) -> Result<CoinHolding> {
    let Some((id, amount)) = s.rsplit_once(':') else {
        bail!("invalid coin '{s}': expected <coin-object-id>:<amount>");
    };
    if id.trim().is_empty() {
        bail!("invalid coin '{s}': missing coin object id");
    }
    Ok(CoinHolding::new(id.trim(), parse_amount(amount)?))
}
