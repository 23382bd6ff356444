//! Thin REST client for the Ethereum wallet backend.
//!
//! The backend holds the account model (nonces, signing, token transfers);
//! this client moves requests and typed records. One instance is shared by
//! the native adapter and every ERC-20 adapter built from the same
//! credentials, so all methods take `&self` and the inner HTTP client is
//! pooled.

use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use walletkit_api::{ApiClient, ApiConfig, ApiError, Method};
use walletkit_traits::{
    AdapterError, AdapterResult, Amount, TransactionDirection, TransactionRecord,
    TransactionStatus, TxHash,
};

use crate::ETHEREUM_DECIMALS;

/// Minimum accepted key material length in bytes
const MIN_KEY_LEN: usize = 16;

/// Configuration for an [`EthereumClient`]
#[derive(Debug, Clone)]
pub struct EthereumConfig {
    /// Base URL of the Ethereum wallet backend
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl EthereumConfig {
    /// Creates a configuration with the given backend URL and default timeout
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_secs: 30,
        }
    }

    /// Sets the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Account-model chain client shared across Ethereum-family adapters.
#[derive(Debug)]
pub struct EthereumClient {
    api: ApiClient,
    account: String,
}

#[derive(Debug, Deserialize)]
struct BalancePayload {
    balance: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DirectionPayload {
    Incoming,
    Outgoing,
}

#[derive(Debug, Deserialize)]
struct TransactionPayload {
    hash: String,
    direction: DirectionPayload,
    amount: String,
    counterparty: String,
    timestamp: u64,
    confirmed: bool,
}

#[derive(Debug, Deserialize)]
struct SendPayload {
    hash: String,
}

impl EthereumClient {
    /// Creates a client from credentials.
    ///
    /// Fails when the key material is too short or when the backend URL is
    /// not usable; the registry collapses either failure into an absent
    /// adapter.
    pub fn new(config: &EthereumConfig, key_material: &[u8]) -> AdapterResult<Self> {
        if key_material.len() < MIN_KEY_LEN {
            return Err(AdapterError::InvalidCredentials(format!(
                "key material shorter than {MIN_KEY_LEN} bytes"
            )));
        }
        let api = ApiClient::new(
            ApiConfig::new(config.api_url.clone()).with_timeout(config.timeout_secs),
        )
        .map_err(|e| AdapterError::Api(e.to_string()))?;
        Ok(Self {
            api,
            account: account_handle(key_material),
        })
    }

    /// Returns the backend account handle derived from the credentials
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Fetches the native ether balance in wei
    pub async fn balance(&self) -> AdapterResult<Amount> {
        self.fetch_balance(&self.path("balance"), ETHEREUM_DECIMALS).await
    }

    /// Fetches an ERC-20 token balance in the token's base unit
    pub async fn token_balance(&self, contract: &str, decimals: u8) -> AdapterResult<Amount> {
        self.fetch_balance(&self.path(&format!("erc20/{contract}/balance")), decimals)
            .await
    }

    /// Fetches a reverse-chronological page of native transfers
    pub async fn transactions(
        &self,
        from: Option<&TxHash>,
        limit: usize,
    ) -> AdapterResult<Vec<TransactionRecord>> {
        self.fetch_transactions(&self.path("transactions"), ETHEREUM_DECIMALS, from, limit)
            .await
    }

    /// Fetches a reverse-chronological page of one token's transfers
    pub async fn token_transactions(
        &self,
        contract: &str,
        decimals: u8,
        from: Option<&TxHash>,
        limit: usize,
    ) -> AdapterResult<Vec<TransactionRecord>> {
        self.fetch_transactions(
            &self.path(&format!("erc20/{contract}/transactions")),
            decimals,
            from,
            limit,
        )
        .await
    }

    /// Submits a native transfer; `gas_price` is in gwei
    pub async fn send(&self, to: &str, amount: &Amount, gas_price: u64) -> AdapterResult<TxHash> {
        self.submit(&self.path("transactions"), to, amount, gas_price).await
    }

    /// Submits a token transfer through the token's contract
    pub async fn send_token(
        &self,
        contract: &str,
        to: &str,
        amount: &Amount,
        gas_price: u64,
    ) -> AdapterResult<TxHash> {
        self.submit(
            &self.path(&format!("erc20/{contract}/transactions")),
            to,
            amount,
            gas_price,
        )
        .await
    }

    async fn fetch_balance(&self, path: &str, decimals: u8) -> AdapterResult<Amount> {
        let payload: BalancePayload = self
            .api
            .fetch(Method::GET, path, None)
            .await
            .map_err(api_error)?;
        let value = payload
            .balance
            .parse::<u128>()
            .map_err(|e| AdapterError::Api(format!("bad balance payload: {e}")))?;
        Ok(Amount::from_smallest_unit(value, decimals))
    }

    async fn fetch_transactions(
        &self,
        path: &str,
        decimals: u8,
        from: Option<&TxHash>,
        limit: usize,
    ) -> AdapterResult<Vec<TransactionRecord>> {
        let mut params = Map::new();
        params.insert("limit".into(), Value::from(limit as u64));
        if let Some(from) = from {
            params.insert("from".into(), Value::String(from.as_str().to_string()));
        }
        let payload: Vec<TransactionPayload> = self
            .api
            .fetch_list(Method::GET, path, Some(&params))
            .await
            .map_err(api_error)?;
        payload
            .into_iter()
            .map(|p| record_from_payload(p, decimals))
            .collect()
    }

    async fn submit(
        &self,
        path: &str,
        to: &str,
        amount: &Amount,
        gas_price: u64,
    ) -> AdapterResult<TxHash> {
        tracing::debug!(path, gas_price, "submitting transaction");
        let mut params = Map::new();
        params.insert("to".into(), Value::String(to.to_string()));
        params.insert("amount".into(), Value::String(amount.smallest_unit().to_string()));
        params.insert("gas_price".into(), Value::from(gas_price));
        let payload: SendPayload = self
            .api
            .fetch(Method::POST, path, Some(&params))
            .await
            .map_err(|e| match e {
                ApiError::Server { status, body } => AdapterError::SendFailed(format!(
                    "backend rejected transaction: status {status}, body {body:?}"
                )),
                other => api_error(other),
            })?;
        Ok(TxHash::new(payload.hash))
    }

    fn path(&self, leaf: &str) -> String {
        format!("account/{}/{leaf}", self.account)
    }
}

fn api_error(err: ApiError) -> AdapterError {
    AdapterError::Api(err.to_string())
}

fn record_from_payload(payload: TransactionPayload, decimals: u8) -> AdapterResult<TransactionRecord> {
    let value = payload
        .amount
        .parse::<u128>()
        .map_err(|e| AdapterError::Api(format!("bad amount payload: {e}")))?;
    Ok(TransactionRecord {
        hash: TxHash::new(payload.hash),
        direction: match payload.direction {
            DirectionPayload::Incoming => TransactionDirection::Incoming,
            DirectionPayload::Outgoing => TransactionDirection::Outgoing,
        },
        amount: Amount::from_smallest_unit(value, decimals),
        counterparty: payload.counterparty,
        timestamp: payload.timestamp,
        status: if payload.confirmed {
            TransactionStatus::Confirmed
        } else {
            TransactionStatus::Pending
        },
    })
}

/// Derives the backend account handle from opaque key material.
///
/// The handle is shaped like an EVM address but is only an API identifier;
/// real address derivation happens server-side.
fn account_handle(key_material: &[u8]) -> String {
    let digest = Sha256::digest(key_material);
    format!("0x{}", hex::encode(&digest[12..32]))
}

/// Validates a string against the EVM address grammar: `0x` followed by 40
/// hex characters.
pub fn validate_eth_address(address: &str) -> AdapterResult<()> {
    let invalid = |reason: &str| AdapterError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };
    let body = address
        .strip_prefix("0x")
        .ok_or_else(|| invalid("missing 0x prefix"))?;
    if body.len() != 40 {
        return Err(invalid("expected 40 hex characters"));
    }
    hex::decode(body).map_err(|_| invalid("not hexadecimal"))?;
    Ok(())
}
