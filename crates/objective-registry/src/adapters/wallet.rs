//! # Local Wallet
//!
//! `MessageSigner` backed by an in-process secp256k1 key.
//! Signs with EIP-191 `personal_sign` semantics so signatures are
//! interchangeable with browser wallets.

use crate::domain::services::{address_from_pubkey, personal_message_hash};
use crate::domain::value_objects::{PlayerAddress, WalletSignature};
use crate::errors::SignerError;
use crate::ports::outbound::MessageSigner;
use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Wallet holding a private key in memory.
pub struct LocalWallet {
    key: SigningKey,
    address: PlayerAddress,
    declining: AtomicBool,
}

impl LocalWallet {
    /// Wallet with a freshly generated key.
    #[must_use]
    pub fn random() -> Self {
        Self::from_key(SigningKey::random(&mut OsRng))
    }

    /// Wallet from a 32-byte private key.
    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self, SignerError> {
        let key = SigningKey::from_bytes(secret.into())
            .map_err(|e| SignerError::Failed(format!("invalid private key: {e}")))?;
        Ok(Self::from_key(key))
    }

    fn from_key(key: SigningKey) -> Self {
        let address = address_from_pubkey(key.verifying_key());
        Self {
            key,
            address,
            declining: AtomicBool::new(false),
        }
    }

    /// Make subsequent signing requests fail with [`SignerError::Declined`].
    pub fn set_declining(&self, declining: bool) {
        self.declining.store(declining, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageSigner for LocalWallet {
    fn address(&self) -> PlayerAddress {
        self.address.clone()
    }

    async fn sign_message(&self, message: &str) -> Result<WalletSignature, SignerError> {
        if self.declining.load(Ordering::SeqCst) {
            debug!(address = %self.address, "Signature request declined");
            return Err(SignerError::Declined);
        }

        let hash = personal_message_hash(message);
        let (sig, recid) = self
            .key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| SignerError::Failed(e.to_string()))?;

        // Low-S form; the recovery id flips with S
        let (sig, v) = match sig.normalize_s() {
            Some(normalized) => (normalized, (recid.to_byte() ^ 1) + 27),
            None => (sig, recid.to_byte() + 27),
        };

        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Ok(WalletSignature { r, s, v })
    }
}

// =============================================================================
// TESTS
// =============================================================================
