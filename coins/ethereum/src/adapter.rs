//! Native ETH and token-scoped ERC-20 adapters.

use async_trait::async_trait;
use std::sync::Arc;
use walletkit_traits::{
    Adapter, AdapterError, AdapterResult, Amount, TransactionRecord, TxHash,
};

use crate::client::{validate_eth_address, EthereumClient};
use crate::ETHEREUM_DECIMALS;

/// Upper bound on plausible token precision; `u128` holds fewer than 39
/// decimal digits.
const MAX_TOKEN_DECIMALS: u8 = 38;

/// Adapter for native ether over a shared [`EthereumClient`].
pub struct EthereumAdapter {
    client: Arc<EthereumClient>,
}

impl EthereumAdapter {
    /// Creates a native ETH adapter over the shared client
    pub fn new(client: Arc<EthereumClient>) -> Self {
        Self { client }
    }

    /// Returns the shared client this adapter references
    pub fn client(&self) -> &Arc<EthereumClient> {
        &self.client
    }
}

#[async_trait]
impl Adapter for EthereumAdapter {
    fn coin(&self) -> &str {
        "ETH"
    }

    fn decimals(&self) -> u8 {
        ETHEREUM_DECIMALS
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
        validate_eth_address(address)
    }

    async fn send(&self, to: &str, amount: Amount, fee_rate: u64) -> AdapterResult<TxHash> {
        validate_eth_address(to)?;
        check_amount(&amount, ETHEREUM_DECIMALS)?;
        self.client.send(to, &amount, fee_rate).await
    }
}

/// Adapter for one ERC-20 token, parameterized by contract address and
/// decimal precision, over the same shared [`EthereumClient`] as the native
/// adapter.
pub struct Erc20Adapter {
    client: Arc<EthereumClient>,
    contract: String,
    decimals: u8,
    code: String,
}

impl Erc20Adapter {
    /// Creates a token adapter.
    ///
    /// Fails when the contract address does not match the EVM address
    /// grammar or when the precision is outside the plausible range. Token
    /// directory entries are untrusted input, so both parameters are
    /// checked here.
    pub fn new(
        client: Arc<EthereumClient>,
        contract: impl Into<String>,
        decimals: u8,
    ) -> AdapterResult<Self> {
        let contract = contract.into();
        validate_eth_address(&contract)?;
        if decimals > MAX_TOKEN_DECIMALS {
            return Err(AdapterError::InvalidAmount(format!(
                "token precision {decimals} exceeds {MAX_TOKEN_DECIMALS}"
            )));
        }
        Ok(Self {
            client,
            contract,
            decimals,
            code: "ERC20".to_string(),
        })
    }

    /// Sets the token code reported by [`Adapter::coin`] (e.g. "USDT")
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Returns the token contract address
    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// Returns the shared client this adapter references
    pub fn client(&self) -> &Arc<EthereumClient> {
        &self.client
    }
}

#[async_trait]
impl Adapter for Erc20Adapter {
    fn coin(&self) -> &str {
        &self.code
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    async fn balance(&self) -> AdapterResult<Amount> {
        self.client.token_balance(&self.contract, self.decimals).await
    }

    async fn transactions(
        &self,
        from: Option<&TxHash>,
        limit: usize,
    ) -> AdapterResult<Vec<TransactionRecord>> {
        self.client
            .token_transactions(&self.contract, self.decimals, from, limit)
            .await
    }

    fn validate_address(&self, address: &str) -> AdapterResult<()> {
        validate_eth_address(address)
    }

    async fn send(&self, to: &str, amount: Amount, fee_rate: u64) -> AdapterResult<TxHash> {
        validate_eth_address(to)?;
        check_amount(&amount, self.decimals)?;
        self.client
            .send_token(&self.contract, to, &amount, fee_rate)
            .await
    }
}

fn check_amount(amount: &Amount, decimals: u8) -> AdapterResult<()> {
    if amount.is_zero() {
        return Err(AdapterError::InvalidAmount("amount is zero".to_string()));
    }
    if amount.decimals != decimals {
        return Err(AdapterError::InvalidAmount(format!(
            "expected {decimals} decimals, got {}",
            amount.decimals
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::EthereumConfig;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";
    const USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    fn shared_client() -> Arc<EthereumClient> {
        Arc::new(
            EthereumClient::new(&EthereumConfig::new("https://eth.example.com"), KEY).unwrap(),
        )
    }

    #[test]
    fn test_eth_adapter_metadata() {
        let adapter = EthereumAdapter::new(shared_client());
        assert_eq!(adapter.coin(), "ETH");
        assert_eq!(adapter.decimals(), 18);
    }

    #[test]
    fn test_erc20_adapter_metadata() {
        let adapter = Erc20Adapter::new(shared_client(), USDT, 6)
            .unwrap()
            .with_code("USDT");
        assert_eq!(adapter.coin(), "USDT");
        assert_eq!(adapter.decimals(), 6);
        assert_eq!(adapter.contract(), USDT);
    }

    #[test]
    fn test_erc20_rejects_malformed_contract() {
        let result = Erc20Adapter::new(shared_client(), "not-a-contract", 6);
        assert!(matches!(result, Err(AdapterError::InvalidAddress { .. })));
    }

    #[test]
    fn test_erc20_rejects_implausible_precision() {
        let result = Erc20Adapter::new(shared_client(), USDT, 200);
        assert!(matches!(result, Err(AdapterError::InvalidAmount(_))));
    }

    #[test]
    fn test_adapters_share_one_client() {
        let client = shared_client();
        let eth = EthereumAdapter::new(client.clone());
        let token = Erc20Adapter::new(client.clone(), USDT, 6).unwrap();
        assert!(Arc::ptr_eq(eth.client(), token.client()));
    }

    #[tokio::test]
    async fn test_send_rejects_wrong_precision() {
        let adapter = Erc20Adapter::new(shared_client(), USDT, 6).unwrap();
        let result = adapter
            .send(USDT, Amount::from_smallest_unit(1, 18), 20)
            .await;
        assert!(matches!(result, Err(AdapterError::InvalidAmount(_))));
    }

    #[tokio::test]
    async fn test_send_rejects_invalid_recipient() {
        let adapter = EthereumAdapter::new(shared_client());
        let result = adapter
            .send("bogus", Amount::from_smallest_unit(1, 18), 20)
            .await;
        assert!(matches!(result, Err(AdapterError::InvalidAddress { .. })));
    }
}
