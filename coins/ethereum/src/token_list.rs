//! ERC-20 token directory lookup.

use serde::Deserialize;
use walletkit_api::{ApiClient, ApiResult, Method};

/// One entry of the ERC-20 token directory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenInfo {
    /// Token code, e.g. "USDT"
    pub code: String,
    /// Human-readable token name
    pub name: String,
    /// Contract address
    pub contract: String,
    /// Decimal precision of the token
    pub decimal: u8,
}

/// Fetches the ERC-20 token directory from `blockchain/ETH/erc20/index.json`.
pub async fn fetch_token_list(api: &ApiClient) -> ApiResult<Vec<TokenInfo>> {
    api.fetch_list(Method::GET, "blockchain/ETH/erc20/index.json", None)
        .await
}
