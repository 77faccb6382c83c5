//! Behavioral tests for the SDK.
//!
//! These tests drive the builder → executor pipeline with in-memory wallet,
//! sponsor and ephemeral-key doubles, without a live network.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use suitudy_sdk::api::LedgerClient;
use suitudy_sdk::execution::{
    ExecutionContext, SponsorRequest, SponsorService, TransactionResponse, WalletSigner,
};
use suitudy_sdk::session::{EphemeralKeyProvider, EphemeralKeypair};
use suitudy_sdk::transaction::{Argument, Command, TransactionIntent};
use suitudy_sdk::{
    Amount, AuthSession, CoinHolding, ExecutionPath, Network, ObjectId, PackageTarget,
    SessionState, SuiAddress, SuitudyConfig, SuitudyError, TransactionExecutor,
};

const WALLET_ACCOUNT: &str = "0x0a11ce";
const OAUTH_ACCOUNT: &str = "0x0b0b";

#[derive(Debug, Clone, PartialEq)]
enum Submission {
    Wallet { commands: usize },
    Sponsor { commands: usize, network: Network, sender: SuiAddress },
}

#[derive(Default)]
struct Ledger {
    submissions: Mutex<Vec<Submission>>,
    wallet_error: Mutex<Option<String>>,
    sponsor_error: Mutex<Option<String>>,
}

impl Ledger {
    fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    fn fail_wallet(&self, message: &str) {
        *self.wallet_error.lock().unwrap() = Some(message.to_string());
    }

    fn fail_sponsor(&self, message: &str) {
        *self.sponsor_error.lock().unwrap() = Some(message.to_string());
    }
}

struct TestWallet(Arc<Ledger>);

#[async_trait]
impl WalletSigner for TestWallet {
    async fn sign_and_execute(&self, intent: &TransactionIntent) -> anyhow::Result<TransactionResponse> {
        self.0.submissions.lock().unwrap().push(Submission::Wallet {
            commands: intent.commands().len(),
        });
        if let Some(message) = self.0.wallet_error.lock().unwrap().clone() {
            anyhow::bail!(message);
        }
        Ok(TransactionResponse {
            digest: "wallet-tx".into(),
            effects: None,
        })
    }
}

struct TestSponsor(Arc<Ledger>);

#[async_trait]
impl SponsorService for TestSponsor {
    async fn sponsor_and_execute(
        &self,
        request: SponsorRequest<'_>,
    ) -> anyhow::Result<TransactionResponse> {
        self.0.submissions.lock().unwrap().push(Submission::Sponsor {
            commands: request.intent.commands().len(),
            network: request.network,
            sender: request.keypair.address(),
        });
        if let Some(message) = self.0.sponsor_error.lock().unwrap().clone() {
            anyhow::bail!(message);
        }
        Ok(TransactionResponse {
            digest: "sponsored-tx".into(),
            effects: Some(serde_json::json!({"status": {"status": "success"}})),
        })
    }
}

#[derive(Debug)]
struct OauthKey;

impl EphemeralKeypair for OauthKey {
    fn address(&self) -> SuiAddress {
        SuiAddress::new(OAUTH_ACCOUNT)
    }
}

struct OauthProvider {
    logged_in: bool,
}

#[async_trait]
impl EphemeralKeyProvider for OauthProvider {
    async fn keypair(&self) -> anyhow::Result<Option<Arc<dyn EphemeralKeypair>>> {
        if self.logged_in {
            Ok(Some(Arc::new(OauthKey)))
        } else {
            Ok(None)
        }
    }
}

struct UnreachableProvider;

#[async_trait]
impl EphemeralKeyProvider for UnreachableProvider {
    async fn keypair(&self) -> anyhow::Result<Option<Arc<dyn EphemeralKeypair>>> {
        anyhow::bail!("key service unreachable")
    }
}

fn setup() -> (Arc<Ledger>, TransactionExecutor) {
    let ledger = Arc::new(Ledger::default());
    let client = Arc::new(LedgerClient::new(SuitudyConfig::testnet()).unwrap());
    let executor = TransactionExecutor::new(
        ExecutionContext::new(client),
        Arc::new(TestWallet(ledger.clone())),
        Arc::new(TestSponsor(ledger.clone())),
    );
    (ledger, executor)
}

fn target() -> PackageTarget {
    SuitudyConfig::testnet().package_target().unwrap()
}

fn tokens(n: u64) -> Amount {
    Amount::from_tokens(n).unwrap()
}

mod routing {
    use super::*;

    #[tokio::test]
    async fn test_wallet_session_signs_with_wallet() {
        let (ledger, executor) = setup();
        let state = SessionState::new();
        let provider = OauthProvider { logged_in: true };
        state
            .connect(SuiAddress::new(WALLET_ACCOUNT), Some(&provider))
            .await;

        let intent = target().buy_token("0.1".parse().unwrap()).unwrap();
        let result = executor.execute_current(&intent, &state).await.unwrap();

        assert_eq!(result.path, ExecutionPath::Standard);
        assert_eq!(ledger.submissions(), vec![Submission::Wallet { commands: 2 }]);
    }

    #[tokio::test]
    async fn test_oauth_session_is_sponsored() {
        let (ledger, executor) = setup();
        let state = SessionState::new();
        state.login(&OauthProvider { logged_in: true }).await.unwrap();

        let intent = target().burn_pass(&ObjectId::new("P1")).unwrap();
        let result = executor.execute_current(&intent, &state).await.unwrap();

        assert_eq!(result.path, ExecutionPath::Sponsored);
        assert_eq!(result.response.digest, "sponsored-tx");
        assert_eq!(
            ledger.submissions(),
            vec![Submission::Sponsor {
                commands: 1,
                network: Network::Testnet,
                sender: SuiAddress::new(OAUTH_ACCOUNT),
            }]
        );
    }

    #[tokio::test]
    async fn test_enoki_style_wallet_connection_is_sponsored() {
        // The OAuth wallet connects like any other wallet; the matching key
        // is what marks it as sponsored.
        let (ledger, executor) = setup();
        let state = SessionState::new();
        let provider = OauthProvider { logged_in: true };
        let session = state
            .connect(SuiAddress::new(OAUTH_ACCOUNT), Some(&provider))
            .await;
        assert!(session.is_sponsored());

        let intent = target().delete_lecture(&ObjectId::new("L1")).unwrap();
        executor.execute(&intent, &session).await.unwrap();

        assert!(matches!(ledger.submissions()[..], [Submission::Sponsor { .. }]));
    }

    #[tokio::test]
    async fn test_oauth_account_goes_to_wallet_when_key_provider_fails() {
        let (ledger, executor) = setup();
        let state = SessionState::new();
        let session = state
            .connect(SuiAddress::new(OAUTH_ACCOUNT), Some(&UnreachableProvider))
            .await;
        assert!(!session.is_sponsored());

        let intent = target().burn_pass(&ObjectId::new("P1")).unwrap();
        let result = executor.execute_current(&intent, &state).await.unwrap();

        assert_eq!(result.path, ExecutionPath::Standard);
        assert_eq!(ledger.submissions(), vec![Submission::Wallet { commands: 1 }]);
    }

    #[tokio::test]
    async fn test_route_follows_session_on_every_call() {
        let (ledger, executor) = setup();
        let state = SessionState::new();
        let intent = target().delete_lecture(&ObjectId::new("L1")).unwrap();

        state.connect(SuiAddress::new(WALLET_ACCOUNT), None).await;
        executor.execute_current(&intent, &state).await.unwrap();

        state.login(&OauthProvider { logged_in: true }).await.unwrap();
        executor.execute_current(&intent, &state).await.unwrap();

        state.connect(SuiAddress::new(WALLET_ACCOUNT), None).await;
        executor.execute_current(&intent, &state).await.unwrap();

        let paths: Vec<bool> = ledger
            .submissions()
            .iter()
            .map(|s| matches!(s, Submission::Sponsor { .. }))
            .collect();
        assert_eq!(paths, vec![false, true, false]);
    }

    #[tokio::test]
    async fn test_logged_out_cannot_execute() {
        let (ledger, executor) = setup();
        let state = SessionState::new();
        state.login(&OauthProvider { logged_in: true }).await.unwrap();
        state.logout();

        let intent = target().delete_lecture(&ObjectId::new("L1")).unwrap();
        let err = executor.execute_current(&intent, &state).await.unwrap_err();

        assert!(matches!(err, SuitudyError::NotConnected));
        assert!(ledger.submissions().is_empty());
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_wallet_network_error_is_wrapped_without_retry() {
        let (ledger, executor) = setup();
        ledger.fail_wallet("network unreachable");

        let session = AuthSession::standard(SuiAddress::new(WALLET_ACCOUNT));
        let holdings = vec![CoinHolding::new("c1", tokens(25))];
        let intent = target()
            .buy_lecture(&ObjectId::new("L1"), tokens(25), &holdings)
            .unwrap();

        let err = executor.execute(&intent, &session).await.unwrap_err();
        let SuitudyError::ExecutionFailed { path, cause } = &err else {
            panic!("expected ExecutionFailed, got {err:?}");
        };
        assert_eq!(*path, ExecutionPath::Standard);
        assert_eq!(cause.to_string(), "network unreachable");
        assert!(!err.is_retryable());
        assert_eq!(ledger.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_sponsor_rejection_is_wrapped() {
        let (ledger, executor) = setup();
        ledger.fail_sponsor("sponsor quota exceeded");

        let session = AuthSession::sponsored(Arc::new(OauthKey));
        let intent = target().burn_pass(&ObjectId::new("P1")).unwrap();
        let err = executor.execute(&intent, &session).await.unwrap_err();

        assert!(matches!(
            err,
            SuitudyError::ExecutionFailed {
                path: ExecutionPath::Sponsored,
                ..
            }
        ));
        assert!(err.to_string().contains("sponsor quota exceeded"));
        assert_eq!(ledger.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_holdings_fail_before_submission() {
        let (ledger, _executor) = setup();

        let err = target().sell_token(tokens(10), &[]).unwrap_err();

        assert!(matches!(err, SuitudyError::InsufficientFunds { .. }));
        assert!(ledger.submissions().is_empty());
    }
}

mod building {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_holdings_from_ledger_feed_sell_token() {
        let server = MockServer::start().await;
        let target = target();
        let token_type = format!("{}::suitudy::SUITUDY", target.package_id);

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"method": "suix_getCoins"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "data": [
                        {"coinType": token_type, "coinObjectId": "c1", "version": "4", "digest": "a", "balance": "30000000000"},
                        {"coinType": token_type, "coinObjectId": "c2", "version": "9", "digest": "b", "balance": "40000000000"}
                    ],
                    "nextCursor": "c2",
                    "hasNextPage": false
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = SuitudyConfig::custom(&server.uri()).unwrap().without_retry();
        let client = Arc::new(LedgerClient::new(config).unwrap());
        let marketplace =
            suitudy_sdk::marketplace::Marketplace::new(client, target.package_id.clone());

        let holdings = marketplace
            .token_holdings(&SuiAddress::new(WALLET_ACCOUNT))
            .await
            .unwrap();
        let intent = target.sell_token(tokens(50), &holdings).unwrap();

        let kinds: Vec<&str> = intent
            .commands()
            .iter()
            .map(|c| match c {
                Command::MergeCoins { .. } => "merge",
                Command::SplitCoins { .. } => "split",
                Command::MoveCall(_) => "call",
            })
            .collect();
        assert_eq!(kinds, vec!["merge", "split", "call"]);

        let call = intent.move_calls().next().unwrap();
        assert_eq!(call.function, "sell_token");
        assert_eq!(call.arguments[1], Argument::NestedResult(1, 0));
    }

    #[test]
    fn test_intent_json_is_wallet_ready() {
        let holdings = vec![
            CoinHolding::new("c1", tokens(30)),
            CoinHolding::new("c2", tokens(40)),
        ];
        let intent = target()
            .buy_lecture(&ObjectId::new("L1"), tokens(50), &holdings)
            .unwrap();
        let json = intent.to_json_value().unwrap();

        assert_eq!(json["version"], 2);
        assert_eq!(json["commands"][0]["MergeCoins"]["destination"], serde_json::json!({"Input": 1}));
        assert_eq!(
            json["commands"][2]["MoveCall"]["arguments"],
            serde_json::json!([{"Input": 3}, {"NestedResult": [1, 0]}])
        );
    }
}
