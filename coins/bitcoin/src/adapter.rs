//! Adapter over one Bitcoin-family account.

use async_trait::async_trait;
use walletkit_traits::{
    Adapter, AdapterError, AdapterResult, Amount, TransactionRecord, TxHash,
};

use crate::address::AddressParser;
use crate::client::BitcoinClient;
use crate::BITCOIN_DECIMALS;

/// Adapter serving Bitcoin or Bitcoin Cash through the uniform interface.
///
/// Owns its [`BitcoinClient`] exclusively; the chain-specific behavior
/// (coin code, scheme handling) is fixed at construction.
pub struct BitcoinAdapter {
    coin: &'static str,
    client: BitcoinClient,
    parser: AddressParser,
}

impl BitcoinAdapter {
    /// Creates an adapter for Bitcoin (`bitcoin:` scheme, prefix stripped)
    pub fn bitcoin(client: BitcoinClient) -> Self {
        Self {
            coin: "BTC",
            client,
            parser: AddressParser::new("bitcoin", true),
        }
    }

    /// Creates an adapter for Bitcoin Cash (`bitcoincash:` scheme, prefix retained)
    pub fn bitcoin_cash(client: BitcoinClient) -> Self {
        Self {
            coin: "BCH",
            client,
            parser: AddressParser::new("bitcoincash", false),
        }
    }

    /// Returns the configured address parser
    pub fn parser(&self) -> &AddressParser {
        &self.parser
    }
}

#[async_trait]
impl Adapter for BitcoinAdapter {
    fn coin(&self) -> &str {
        self.coin
    }

    fn decimals(&self) -> u8 {
        BITCOIN_DECIMALS
    }

    async fn balance(&self) -> AdapterResult<Amount> {
        self.client.balance().await
    }

    async fn transactions(
        &self,
        from: Option<&TxHash>,
        limit: usize,
    ) -> AdapterResult<Vec<TransactionRecord>> {
        self.client.transactions(from, limit).await
    }

    fn validate_address(&self, address: &str) -> AdapterResult<()> {
        self.parser.parse(address).map(|_| ())
    }

    async fn send(&self, to: &str, amount: Amount, fee_rate: u64) -> AdapterResult<TxHash> {
        let recipient = self.parser.parse(to)?;
        if amount.is_zero() {
            return Err(AdapterError::InvalidAmount("amount is zero".to_string()));
        }
        if amount.decimals != BITCOIN_DECIMALS {
            return Err(AdapterError::InvalidAmount(format!(
                "expected {BITCOIN_DECIMALS} decimals, got {}",
                amount.decimals
            )));
        }
        self.client.send(&recipient, &amount, fee_rate).await
    }
}
