//! Bitcoin-family support for WalletKit.
//!
//! Covers Bitcoin and Bitcoin Cash. Both chains share the HD-account client
//! and adapter; they differ only in coin code and in how their payment-URI
//! scheme is handled by the [`AddressParser`]: `bitcoin:` is stripped before
//! validation while `bitcoincash:` addresses keep their prefix.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod address;
mod adapter;
mod client;

pub use adapter::BitcoinAdapter;
pub use address::AddressParser;
pub use client::{BitcoinClient, BitcoinConfig};

/// Number of decimal places for Bitcoin-family coins
pub const BITCOIN_DECIMALS: u8 = 8;
