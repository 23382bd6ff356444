//! Logical asset descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tagged identifier of a supported asset and its chain-specific parameters.
///
/// Immutable; tells the factory which chain backend to instantiate and what
/// parameters it needs. ERC-20 tokens carry their contract address and
/// decimal precision with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinDescriptor {
    /// Native Bitcoin
    Bitcoin,
    /// Native Bitcoin Cash
    BitcoinCash,
    /// Native Ethereum
    Ethereum,
    /// An ERC-20 token on Ethereum
    Erc20 {
        /// Token contract address
        contract: String,
        /// Decimal precision of the token
        decimals: u8,
    },
}

impl CoinDescriptor {
    /// Returns true for assets served by the shared Ethereum client
    pub fn is_ethereum_family(&self) -> bool {
        matches!(self, CoinDescriptor::Ethereum | CoinDescriptor::Erc20 { .. })
    }
}

impl fmt::Display for CoinDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinDescriptor::Bitcoin => write!(f, "bitcoin"),
            CoinDescriptor::BitcoinCash => write!(f, "bitcoin-cash"),
            CoinDescriptor::Ethereum => write!(f, "ethereum"),
            CoinDescriptor::Erc20 { contract, .. } => write!(f, "erc20:{contract}"),
        }
    }
}
