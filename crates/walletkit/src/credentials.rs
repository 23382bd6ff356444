//! Opaque key material for chain client construction.

use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Key material required to instantiate a chain client.
///
/// Owned by the caller and passed by reference into adapter construction;
/// the factory never persists it. The bytes are wiped on drop, and the only
/// derived value that leaves this type is a digest fingerprint used to key
/// the shared Ethereum client and to address backend accounts.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    key_material: Vec<u8>,
}

impl Credentials {
    /// Wraps the given key material
    pub fn new(key_material: impl Into<Vec<u8>>) -> Self {
        Self {
            key_material: key_material.into(),
        }
    }

    /// Returns the raw key material
    pub fn key_material(&self) -> &[u8] {
        &self.key_material
    }

    /// Returns a stable digest of the key material.
    ///
    /// Two credentials compare equal for client-sharing purposes exactly
    /// when their fingerprints match.
    pub fn fingerprint(&self) -> [u8; 32] {
        Sha256::digest(&self.key_material).into()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        f.debug_struct("Credentials")
            .field("fingerprint", &hex::encode(&self.fingerprint()[..4]))
            .finish()
    }
}
