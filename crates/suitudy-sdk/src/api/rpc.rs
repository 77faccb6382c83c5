//! JSON-RPC client for ledger queries.

use crate::api::response::{Balance, EventId, ObjectResponse, Page, SuiEvent};
use crate::config::{Network, SuitudyConfig};
use crate::error::{SuitudyError, SuitudyResult};
use crate::retry::{RetryConfig, RetryExecutor};
use crate::types::{CoinHolding, ObjectId, SuiAddress};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use url::Url;

/// Maximum number of ids accepted by one `sui_multiGetObjects` call.
pub const MAX_OBJECTS_PER_REQUEST: usize = 50;

/// Client for the ledger's JSON-RPC read API.
///
/// Every query is retried with exponential backoff on transient failures,
/// according to the config's [`RetryConfig`]. The client never submits
/// transactions; that is left to the execution capabilities.
///
/// # Example
///
/// ```rust,no_run
/// use suitudy_sdk::api::LedgerClient;
/// use suitudy_sdk::SuitudyConfig;
/// use suitudy_sdk::types::SuiAddress;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = LedgerClient::new(SuitudyConfig::testnet())?;
///     let owner = SuiAddress::new("0x7a1c");
///     let balance = client.get_balance(&owner, None).await?;
///     println!("{} SUI", balance.total_balance);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LedgerClient {
    network: Network,
    rpc_url: Url,
    client: Client,
    retry_config: Arc<RetryConfig>,
    next_id: Arc<AtomicU64>,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl LedgerClient {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SuitudyConfig) -> SuitudyResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SuitudyError::Http)?;

        Ok(Self {
            network: config.network,
            rpc_url: config.rpc_url,
            client,
            retry_config: Arc::new(config.retry_config),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Returns the network this client talks to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the JSON-RPC endpoint.
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// Calls `method` with `params` and deserializes the result.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::Rpc`] if the endpoint answers with an error
    /// object, [`SuitudyError::Api`] on a non-success HTTP status, and
    /// transport or decoding errors otherwise.
    pub async fn call<T: DeserializeOwned + Send + 'static>(
        &self,
        method: &str,
        params: Value,
    ) -> SuitudyResult<T> {
        let executor = RetryExecutor::new((*self.retry_config).clone());
        executor
            .execute(|| {
                let client = self.client.clone();
                let url = self.rpc_url.clone();
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let params = &params;
                async move {
                    debug!(method, id, "Sending JSON-RPC request");
                    let request = RpcRequest {
                        jsonrpc: "2.0",
                        id,
                        method,
                        params,
                    };
                    let response = client.post(url).json(&request).send().await?;

                    let status = response.status();
                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(SuitudyError::api(status.as_u16(), body));
                    }

                    let body: RpcResponse<T> = response.json().await?;
                    if let Some(error) = body.error {
                        return Err(SuitudyError::Rpc {
                            code: error.code,
                            message: error.message,
                        });
                    }
                    body.result.ok_or_else(|| {
                        SuitudyError::Internal(format!("{method} returned no result"))
                    })
                }
            })
            .await
    }

    /// Fetches one page of coins of `coin_type` (SUI when `None`) owned by `owner`.
    pub async fn get_coins(
        &self,
        owner: &SuiAddress,
        coin_type: Option<&str>,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> SuitudyResult<Page<CoinHolding>> {
        self.call(
            "suix_getCoins",
            json!([owner.as_str(), coin_type, cursor, limit]),
        )
        .await
    }

    /// Fetches every coin of `coin_type` owned by `owner`, following pages.
    pub async fn get_all_coins(
        &self,
        owner: &SuiAddress,
        coin_type: Option<&str>,
    ) -> SuitudyResult<Vec<CoinHolding>> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .get_coins(owner, coin_type, cursor.as_deref(), None)
                .await?;
            let next = page.next().cloned();
            coins.extend(page.data);
            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        debug!(owner = %owner, count = coins.len(), "Fetched coin holdings");
        Ok(coins)
    }

    /// Returns the total balance of `coin_type` (SUI when `None`) owned by `owner`.
    pub async fn get_balance(
        &self,
        owner: &SuiAddress,
        coin_type: Option<&str>,
    ) -> SuitudyResult<Balance> {
        self.call("suix_getBalance", json!([owner.as_str(), coin_type]))
            .await
    }

    /// Fetches one page of objects of `struct_type` owned by `owner`, with content.
    pub async fn get_owned_objects(
        &self,
        owner: &SuiAddress,
        struct_type: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> SuitudyResult<Page<ObjectResponse>> {
        let query = json!({
            "filter": {"StructType": struct_type},
            "options": {"showContent": true, "showType": true}
        });
        self.call(
            "suix_getOwnedObjects",
            json!([owner.as_str(), query, cursor, limit]),
        )
        .await
    }

    /// Fetches one page of events emitted by `package::module`.
    pub async fn query_events(
        &self,
        package: &ObjectId,
        module: &str,
        cursor: Option<&EventId>,
        limit: Option<usize>,
        descending: bool,
    ) -> SuitudyResult<Page<SuiEvent, EventId>> {
        let filter = json!({"MoveModule": {"package": package.as_str(), "module": module}});
        self.call(
            "suix_queryEvents",
            json!([filter, cursor, limit, descending]),
        )
        .await
    }

    /// Reads `ids` with content, in order. Deleted objects come back with
    /// an error entry rather than failing the whole call.
    pub async fn multi_get_objects(&self, ids: &[ObjectId]) -> SuitudyResult<Vec<ObjectResponse>> {
        let mut objects = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_OBJECTS_PER_REQUEST) {
            let batch: Vec<ObjectResponse> = self
                .call(
                    "sui_multiGetObjects",
                    json!([chunk, {"showContent": true, "showType": true}]),
                )
                .await?;
            objects.extend(batch);
        }
        Ok(objects)
    }
}
