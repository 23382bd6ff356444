//! # WalletKit - Unified Multi-Chain Wallet Adapter Core
//!
//! WalletKit maps a logical asset descriptor plus key material to a concrete
//! backend adapter behind one interface. The [`AdapterFactory`] dispatches on
//! the [`CoinDescriptor`] variant, constructs the chain-specific client, and
//! wraps it in a [`walletkit_traits::Adapter`]; calling code thereafter only
//! interacts through that interface.
//!
//! ## Example
//!
//! ```ignore
//! use walletkit::{AdapterFactory, CoinDescriptor, Credentials, FactoryConfig};
//!
//! let factory = AdapterFactory::new(FactoryConfig::main(
//!     "https://btc.backend",
//!     "https://bch.backend",
//!     "https://eth.backend",
//! ));
//! let credentials = Credentials::new(seed_bytes);
//!
//! // `None` means "asset unavailable" - unsupported parameters and rejected
//! // credentials are indistinguishable on purpose.
//! if let Some(adapter) = factory.adapter(&CoinDescriptor::Ethereum, &credentials) {
//!     let balance = adapter.balance().await?;
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod coin;
mod credentials;
mod factory;

pub use coin::CoinDescriptor;
pub use credentials::Credentials;
pub use factory::{AdapterFactory, FactoryConfig};

pub use walletkit_traits as traits;
pub use walletkit_traits::{Adapter, AdapterError, AdapterResult, Amount, NetworkKind, TxHash};

/// Bitcoin-family functionality
pub mod bitcoin {
    pub use walletkit_bitcoin::*;
}

/// Ethereum and ERC-20 functionality
pub mod ethereum {
    pub use walletkit_ethereum::*;
}

/// Exchange-rate lookup
pub mod rates {
    pub use walletkit_rates::*;
}

/// REST/JSON client
pub mod api {
    pub use walletkit_api::*;
}
