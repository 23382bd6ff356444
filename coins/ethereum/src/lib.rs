//! Ethereum-family support for WalletKit.
//!
//! One [`EthereumClient`] serves both the native ETH adapter and every
//! ERC-20 adapter built from the same credentials. The client is safe for
//! concurrent use, so adapter construction shares it behind an `Arc`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod client;
mod token_list;

pub use adapter::{Erc20Adapter, EthereumAdapter};
pub use client::{validate_eth_address, EthereumClient, EthereumConfig};
pub use token_list::{fetch_token_list, TokenInfo};

/// Number of decimal places for native ether
pub const ETHEREUM_DECIMALS: u8 = 18;
