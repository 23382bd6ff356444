//! Thin REST client for the Bitcoin-family wallet backend.
//!
//! The backend manages the HD account (address derivation, UTXO tracking,
//! signing) server-side; this client only moves requests and typed records.

use serde::Deserialize;
use serde_json::{Map, Value};
use walletkit_api::{ApiClient, ApiConfig, ApiError, Method};
use walletkit_traits::{
    AdapterError, AdapterResult, Amount, NetworkKind, TransactionDirection, TransactionRecord,
    TransactionStatus, TxHash,
};

use crate::BITCOIN_DECIMALS;

/// Configuration for a [`BitcoinClient`]
#[derive(Debug, Clone)]
pub struct BitcoinConfig {
    /// Base URL of the wallet backend for this chain
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BitcoinConfig {
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

/// Chain client for one HD wallet account on a Bitcoin-family backend.
///
/// Each client owns its connection exclusively; the factory constructs a
/// fresh one per adapter.
#[derive(Debug, Clone)]
pub struct BitcoinClient {
    api: ApiClient,
    network: NetworkKind,
    account: String,
}

#[derive(Debug, Deserialize)]
struct BalancePayload {
    confirmed: String,
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

impl BitcoinClient {
    /// Creates a client for the given network mode and backend account
    pub fn new(
        config: &BitcoinConfig,
        network: NetworkKind,
        account: impl Into<String>,
    ) -> AdapterResult<Self> {
        let api = ApiClient::new(
            ApiConfig::new(config.api_url.clone()).with_timeout(config.timeout_secs),
        )
        .map_err(api_error)?;
        Ok(Self {
            api,
            network,
            account: account.into(),
        })
    }

    /// Returns the network mode this client operates in
    pub fn network(&self) -> NetworkKind {
        self.network
    }

    /// Returns the backend account handle
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Fetches the confirmed balance in satoshi
    pub async fn balance(&self) -> AdapterResult<Amount> {
        let payload: BalancePayload = self
            .api
            .fetch(Method::GET, &self.path("balance"), None)
            .await
            .map_err(api_error)?;
        let value = payload
            .confirmed
            .parse::<u128>()
            .map_err(|e| AdapterError::Api(format!("bad balance payload: {e}")))?;
        Ok(Amount::from_smallest_unit(value, BITCOIN_DECIMALS))
    }

    /// Fetches a reverse-chronological page of the account's history
    pub async fn transactions(
        &self,
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
            .fetch_list(Method::GET, &self.path("transactions"), Some(&params))
            .await
            .map_err(api_error)?;
        payload.into_iter().map(record_from_payload).collect()
    }

    /// Submits a payment and returns the transaction hash
    pub async fn send(&self, to: &str, amount: &Amount, fee_rate: u64) -> AdapterResult<TxHash> {
        tracing::debug!(network = %self.network, fee_rate, "submitting payment");
        let mut params = Map::new();
        params.insert("to".into(), Value::String(to.to_string()));
        params.insert("amount".into(), Value::String(amount.smallest_unit().to_string()));
        params.insert("fee_rate".into(), Value::from(fee_rate));
        let payload: SendPayload = self
            .api
            .fetch(Method::POST, &self.path("payments"), Some(&params))
            .await
            .map_err(|e| match e {
                ApiError::Server { status, body } => AdapterError::SendFailed(format!(
                    "backend rejected payment: status {status}, body {body:?}"
                )),
                other => api_error(other),
            })?;
        Ok(TxHash::new(payload.hash))
    }

    fn path(&self, leaf: &str) -> String {
        format!("wallet/{}/{}/{leaf}", self.network, self.account)
    }
}

fn api_error(err: ApiError) -> AdapterError {
    AdapterError::Api(err.to_string())
}

fn record_from_payload(payload: TransactionPayload) -> AdapterResult<TransactionRecord> {
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
        amount: Amount::from_smallest_unit(value, BITCOIN_DECIMALS),
        counterparty: payload.counterparty,
        timestamp: payload.timestamp,
        status: if payload.confirmed {
            TransactionStatus::Confirmed
        } else {
            TransactionStatus::Pending
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_paths_carry_network_and_account() {
        let client = BitcoinClient::new(
            &BitcoinConfig::new("https://btc.example.com"),
            NetworkKind::Test,
            "acct1",
        )
        .unwrap();
        assert_eq!(client.path("balance"), "wallet/test/acct1/balance");
    }

    #[test]
    fn test_invalid_backend_url_is_api_error() {
        let result = BitcoinClient::new(&BitcoinConfig::new("::::"), NetworkKind::Main, "a");
        assert!(matches!(result, Err(AdapterError::Api(_))));
    }

    #[test]
    fn test_record_mapping() {
        let record = record_from_payload(TransactionPayload {
            hash: "abc".into(),
            direction: DirectionPayload::Outgoing,
            amount: "1500".into(),
            counterparty: "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa".into(),
            timestamp: 1_700_000_000,
            confirmed: false,
        })
        .unwrap();
        assert_eq!(record.direction, TransactionDirection::Outgoing);
        assert_eq!(record.amount.smallest_unit(), 1500);
        assert_eq!(record.status, TransactionStatus::Pending);
    }

    #[test]
    fn test_unparsable_amount_is_api_error() {
        let result = record_from_payload(TransactionPayload {
            hash: "abc".into(),
            direction: DirectionPayload::Incoming,
            amount: "lots".into(),
            counterparty: "x".into(),
            timestamp: 0,
            confirmed: true,
        });
        assert!(matches!(result, Err(AdapterError::Api(_))));
    }
}
