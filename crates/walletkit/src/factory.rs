//! Coin/adapter registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use walletkit_bitcoin::{BitcoinAdapter, BitcoinClient, BitcoinConfig};
use walletkit_ethereum::{Erc20Adapter, EthereumAdapter, EthereumClient, EthereumConfig};
use walletkit_traits::{Adapter, NetworkKind};

use crate::{CoinDescriptor, Credentials};

/// Backend endpoints and network mode for the factory.
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    /// Network mode adapters are constructed in
    pub network: NetworkKind,
    /// Bitcoin wallet backend base URL
    pub bitcoin_api_url: String,
    /// Bitcoin Cash wallet backend base URL
    pub bitcoin_cash_api_url: String,
    /// Ethereum wallet backend base URL
    pub ethereum_api_url: String,
    /// Request timeout applied to every chain client, in seconds
    pub timeout_secs: u64,
}

impl FactoryConfig {
    /// Creates a main-network configuration
    pub fn main(
        bitcoin_api_url: impl Into<String>,
        bitcoin_cash_api_url: impl Into<String>,
        ethereum_api_url: impl Into<String>,
    ) -> Self {
        Self::with_network(
            NetworkKind::Main,
            bitcoin_api_url,
            bitcoin_cash_api_url,
            ethereum_api_url,
        )
    }

    /// Creates a configuration for the given network mode
    pub fn with_network(
        network: NetworkKind,
        bitcoin_api_url: impl Into<String>,
        bitcoin_cash_api_url: impl Into<String>,
        ethereum_api_url: impl Into<String>,
    ) -> Self {
        Self {
            network,
            bitcoin_api_url: bitcoin_api_url.into(),
            bitcoin_cash_api_url: bitcoin_cash_api_url.into(),
            ethereum_api_url: ethereum_api_url.into(),
            timeout_secs: 30,
        }
    }

    /// Sets the chain client request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Maps a coin descriptor plus credentials to a concrete backend adapter.
///
/// The factory holds no adapter state: every call produces a fresh adapter
/// or nothing. The one piece of shared state is the per-credentials Ethereum
/// client, held weakly so its lifetime is exactly that of the longest-lived
/// adapter referencing it.
pub struct AdapterFactory {
    config: FactoryConfig,
    eth_clients: Mutex<HashMap<[u8; 32], Weak<EthereumClient>>>,
}

impl AdapterFactory {
    /// Creates a factory over the given backend configuration
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            config,
            eth_clients: Mutex::new(HashMap::new()),
        }
    }

    /// Produces an adapter for the given (coin, credentials) pair.
    ///
    /// Returns `None` when the underlying chain client cannot be
    /// constructed. Callers must treat that as "asset unavailable": an
    /// unsupported parameter and rejected credentials are deliberately
    /// indistinguishable. The construction error is logged before being
    /// discarded.
    pub fn adapter(
        &self,
        coin: &CoinDescriptor,
        credentials: &Credentials,
    ) -> Option<Box<dyn Adapter>> {
        match coin {
            CoinDescriptor::Bitcoin => {
                let client = self.bitcoin_client(&self.config.bitcoin_api_url, coin, credentials)?;
                Some(Box::new(BitcoinAdapter::bitcoin(client)))
            }
            CoinDescriptor::BitcoinCash => {
                let client =
                    self.bitcoin_client(&self.config.bitcoin_cash_api_url, coin, credentials)?;
                Some(Box::new(BitcoinAdapter::bitcoin_cash(client)))
            }
            CoinDescriptor::Ethereum => {
                let client = self.ethereum_client(credentials)?;
                Some(Box::new(EthereumAdapter::new(client)))
            }
            CoinDescriptor::Erc20 { contract, decimals } => {
                let client = self.ethereum_client(credentials)?;
                match Erc20Adapter::new(client, contract.clone(), *decimals) {
                    Ok(adapter) => Some(Box::new(adapter)),
                    Err(err) => {
                        tracing::warn!(%coin, %err, "token adapter construction failed");
                        None
                    }
                }
            }
        }
    }

    fn bitcoin_client(
        &self,
        api_url: &str,
        coin: &CoinDescriptor,
        credentials: &Credentials,
    ) -> Option<BitcoinClient> {
        let config = BitcoinConfig::new(api_url).with_timeout(self.config.timeout_secs);
        let account = hex::encode(credentials.fingerprint());
        match BitcoinClient::new(&config, self.config.network, account) {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::warn!(%coin, %err, "chain client construction failed");
                None
            }
        }
    }

    /// Acquires the shared Ethereum client for these credentials, lazily
    /// constructing it when no live adapter currently holds one.
    fn ethereum_client(&self, credentials: &Credentials) -> Option<Arc<EthereumClient>> {
        let key = credentials.fingerprint();
        let mut clients = self.eth_clients.lock().ok()?;

        if let Some(client) = clients.get(&key).and_then(Weak::upgrade) {
            return Some(client);
        }

        let config = EthereumConfig::new(self.config.ethereum_api_url.clone())
            .with_timeout(self.config.timeout_secs);
        match EthereumClient::new(&config, credentials.key_material()) {
            Ok(client) => {
                let client = Arc::new(client);
                clients.retain(|_, weak| weak.strong_count() > 0);
                clients.insert(key, Arc::downgrade(&client));
                Some(client)
            }
            Err(err) => {
                tracing::warn!(%err, "ethereum client construction failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> AdapterFactory {
        AdapterFactory::new(FactoryConfig::main(
            "https://btc.example.com",
            "https://bch.example.com",
            "https://eth.example.com",
        ))
    }

    fn credentials() -> Credentials {
        Credentials::new(*b"0123456789abcdef0123456789abcdef")
    }

    #[test]
    fn test_dispatch_assigns_coin_codes() {
        let factory = factory();
        let creds = credentials();
        assert_eq!(factory.adapter(&CoinDescriptor::Bitcoin, &creds).unwrap().coin(), "BTC");
        assert_eq!(
            factory.adapter(&CoinDescriptor::BitcoinCash, &creds).unwrap().coin(),
            "BCH"
        );
        assert_eq!(factory.adapter(&CoinDescriptor::Ethereum, &creds).unwrap().coin(), "ETH");
    }

    #[test]
    fn test_rejected_credentials_yield_absent_adapter() {
        let factory = factory();
        let creds = Credentials::new(b"tiny".to_vec());
        assert!(factory.adapter(&CoinDescriptor::Ethereum, &creds).is_none());
        // Bitcoin-family construction does not inspect the key material.
        assert!(factory.adapter(&CoinDescriptor::Bitcoin, &creds).is_some());
    }

    #[test]
    fn test_invalid_token_contract_yields_absent_adapter() {
        let factory = factory();
        let coin = CoinDescriptor::Erc20 {
            contract: "not-a-contract".into(),
            decimals: 6,
        };
        assert!(factory.adapter(&coin, &credentials()).is_none());
    }

    #[test]
    fn test_same_credentials_share_one_ethereum_client() {
        let factory = factory();
        let creds = credentials();

        let a = factory.ethereum_client(&creds).unwrap();
        let b = factory.ethereum_client(&creds).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let other = Credentials::new(*b"fedcba9876543210fedcba9876543210");
        let c = factory.ethereum_client(&other).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_dropped_adapters_release_shared_client() {
        let factory = factory();
        let creds = credentials();

        let adapter = factory.adapter(&CoinDescriptor::Ethereum, &creds).unwrap();
        {
            let clients = factory.eth_clients.lock().unwrap();
            assert_eq!(clients.len(), 1);
            assert!(clients.values().next().unwrap().upgrade().is_some());
        }

        drop(adapter);
        let clients = factory.eth_clients.lock().unwrap();
        assert!(clients.values().next().unwrap().upgrade().is_none());
    }
}
