//! # WalletKit Traits
//!
//! This crate provides the uniform adapter interface for the WalletKit
//! multi-chain wallet core. Every chain backend (Bitcoin-family, Ethereum,
//! ERC-20 tokens) is wrapped in an [`Adapter`], so calling code never
//! dispatches on the coin type after construction.
//!
//! ## Core items
//!
//! - [`Adapter`] - balance, paged history, address validation, send
//! - [`Amount`] - smallest-unit value with chain-native precision
//! - [`TransactionRecord`] - one entry of the paged transaction history
//! - [`NetworkKind`] - main or test network mode
//!
//! ## Example
//!
//! ```ignore
//! use walletkit_traits::prelude::*;
//!
//! async fn show_balance(adapter: &dyn Adapter) -> Result<Amount, AdapterError> {
//!     adapter.balance().await
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a blockchain amount with chain-native precision.
///
/// Wraps the smallest unit of a currency (wei, satoshi, token base unit)
/// together with the number of decimal places used to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount {
    /// The value in the smallest unit of the currency
    pub value: u128,
    /// Number of decimal places for the currency (e.g. 18 for ETH, 8 for BTC)
    pub decimals: u8,
}

impl Amount {
    /// Creates a new Amount from the smallest unit value
    pub fn from_smallest_unit(value: u128, decimals: u8) -> Self {
        Self { value, decimals }
    }

    /// Creates a new Amount from a human-readable value.
    ///
    /// The conversion goes through `f64`, so it saturates instead of
    /// overflowing for precisions beyond what `u128` can scale.
    pub fn from_human(value: f64, decimals: u8) -> Self {
        let smallest = (value * 10f64.powi(decimals as i32)) as u128;
        Self { value: smallest, decimals }
    }

    /// Returns the value in the smallest unit
    pub fn smallest_unit(&self) -> u128 {
        self.value
    }

    /// Returns the value in human-readable form
    pub fn human_readable(&self) -> f64 {
        self.value as f64 / 10f64.powi(self.decimals as i32)
    }

    /// Returns zero amount with the specified decimals
    pub fn zero(decimals: u8) -> Self {
        Self { value: 0, decimals }
    }

    /// Checks if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.precision$}", self.human_readable(), precision = self.decimals as usize)
    }
}

/// Represents a transaction hash/ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub String);

impl TxHash {
    /// Creates a new TxHash from a string
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TxHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Network mode an adapter operates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkKind {
    /// Production network
    Main,
    /// Test network
    Test,
}

impl NetworkKind {
    /// Returns true for test networks
    pub fn is_test(&self) -> bool {
        matches!(self, NetworkKind::Test)
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkKind::Main => write!(f, "main"),
            NetworkKind::Test => write!(f, "test"),
        }
    }
}

/// Direction of a history entry relative to the wallet account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionDirection {
    /// Funds received by the account
    Incoming,
    /// Funds sent from the account
    Outgoing,
}

/// Confirmation status of a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Transaction is pending confirmation
    Pending,
    /// Transaction has been confirmed
    Confirmed,
    /// Transaction failed
    Failed,
}

/// One entry of an adapter's transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction hash
    pub hash: TxHash,
    /// Whether funds moved into or out of the account
    pub direction: TransactionDirection,
    /// Transferred amount in the coin's native precision
    pub amount: Amount,
    /// Counterparty address (sender for incoming, recipient for outgoing)
    pub counterparty: String,
    /// Unix timestamp of the block (or first-seen time while pending)
    pub timestamp: u64,
    /// Confirmation status
    pub status: TransactionStatus,
}

/// Errors surfaced by adapter operations
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Address failed the coin's own grammar
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress {
        /// The rejected address
        address: String,
        /// Reason for rejection
        reason: String,
    },

    /// Amount could not be applied (zero, overflow, wrong precision)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Key material was rejected at client construction
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Transaction submission was rejected by the backend
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Underlying network/API failure
    #[error("API error: {0}")]
    Api(String),
}

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Uniform balance/history/send interface over one chain-specific client.
///
/// Every concrete adapter exposes identical method signatures regardless of
/// whether the backend is an HD-wallet account (Bitcoin family) or an
/// account-model chain (Ethereum family). This is the polymorphism point of
/// the SDK: after construction, callers hold a `Box<dyn Adapter>` and never
/// switch on the coin again.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Returns the coin code this adapter serves (e.g. "BTC", "ETH", "USDT")
    fn coin(&self) -> &str;

    /// Returns the number of decimal places of the coin
    fn decimals(&self) -> u8;

    /// Returns the current confirmed balance in chain-native precision
    async fn balance(&self) -> AdapterResult<Amount>;

    /// Returns a page of transaction history, reverse-chronological.
    ///
    /// `from` is an exclusive cursor: when present, the page starts after
    /// that transaction; when absent, the page starts at the newest entry.
    async fn transactions(
        &self,
        from: Option<&TxHash>,
        limit: usize,
    ) -> AdapterResult<Vec<TransactionRecord>>;

    /// Validates an address against the coin's own address grammar
    fn validate_address(&self, address: &str) -> AdapterResult<()>;

    /// Submits a transaction and returns its hash.
    ///
    /// `fee_rate` is in the chain's native fee unit (sat/vB for the Bitcoin
    /// family, gwei gas price for the Ethereum family).
    async fn send(&self, to: &str, amount: Amount, fee_rate: u64) -> AdapterResult<TxHash>;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Adapter, AdapterError, AdapterResult, Amount, NetworkKind, TransactionDirection,
        TransactionRecord, TransactionStatus, TxHash,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Amount Tests
    // ============================================================================

    #[test]
    fn test_amount_conversion() {
        // 1 ETH = 1e18 wei
        let amount = Amount::from_human(1.0, 18);
        assert_eq!(amount.smallest_unit(), 1_000_000_000_000_000_000);
        assert!((amount.human_readable() - 1.0).abs() < 0.0001);

        // 1 BTC = 1e8 satoshi
        let btc = Amount::from_human(1.0, 8);
        assert_eq!(btc.smallest_unit(), 100_000_000);
    }

    #[test]
    fn test_amount_zero() {
        let zero = Amount::zero(8);
        assert!(zero.is_zero());
        assert_eq!(zero.smallest_unit(), 0);
    }

    #[test]
    fn test_amount_from_smallest_unit() {
        let amount = Amount::from_smallest_unit(1_000_000, 6);
        assert_eq!(amount.smallest_unit(), 1_000_000);
        assert_eq!(amount.decimals, 6);
        assert!((amount.human_readable() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_amount_display() {
        let amount = Amount::from_human(1.5, 8);
        let display = format!("{}", amount);
        assert!(display.contains("1.5"));
    }

    #[test]
    fn test_amount_extreme_decimals_do_not_panic() {
        // A corrupt precision value must degrade, not abort.
        let amount = Amount::from_smallest_unit(1, 200);
        assert!(amount.human_readable() < 1e-100);
        assert!(!amount.to_string().is_empty());

        let saturated = Amount::from_human(1.0, 200);
        assert_eq!(saturated.smallest_unit(), u128::MAX);
    }

    #[test]
    fn test_amount_comparison() {
        let a = Amount::from_smallest_unit(100, 8);
        let b = Amount::from_smallest_unit(200, 8);

        assert!(a < b);
        assert_eq!(a, Amount::from_smallest_unit(100, 8));
    }

    // ============================================================================
    // TxHash Tests
    // ============================================================================

    #[test]
    fn test_tx_hash() {
        let hash = TxHash::new("0x1234567890abcdef");
        assert_eq!(hash.as_str(), "0x1234567890abcdef");
        assert_eq!(format!("{}", hash), "0x1234567890abcdef");
    }

    #[test]
    fn test_tx_hash_from_str() {
        let hash: TxHash = "0xefgh".into();
        assert_eq!(hash.as_str(), "0xefgh");
    }

    #[test]
    fn test_tx_hash_equality() {
        assert_eq!(TxHash::new("0x123"), TxHash::new("0x123"));
        assert_ne!(TxHash::new("0x123"), TxHash::new("0x456"));
    }

    // ============================================================================
    // NetworkKind Tests
    // ============================================================================

    #[test]
    fn test_network_kind() {
        assert!(!NetworkKind::Main.is_test());
        assert!(NetworkKind::Test.is_test());
        assert_eq!(format!("{}", NetworkKind::Main), "main");
        assert_eq!(format!("{}", NetworkKind::Test), "test");
    }

    // ============================================================================
    // TransactionRecord Tests
    // ============================================================================

    #[test]
    fn test_transaction_record_serialization() {
        let record = TransactionRecord {
            hash: TxHash::new("abc123"),
            direction: TransactionDirection::Incoming,
            amount: Amount::from_smallest_unit(5_000, 8),
            counterparty: "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa".to_string(),
            timestamp: 1_700_000_000,
            status: TransactionStatus::Confirmed,
        };

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: TransactionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }

    // ============================================================================
    // AdapterError Tests
    // ============================================================================

    #[test]
    fn test_adapter_error_display() {
        let err = AdapterError::InvalidAddress {
            address: "xyz".to_string(),
            reason: "unexpected character".to_string(),
        };
        assert!(err.to_string().contains("xyz"));
        assert!(err.to_string().contains("unexpected character"));

        let err = AdapterError::SendFailed("rejected by node".to_string());
        assert!(err.to_string().contains("rejected by node"));
    }
}
