//! # Driven Ports (SPI - Outbound)
//!
//! These are the interfaces the registry depends on.
//! External adapters implement these traits to provide:
//! - A flat key-value store addressed by string keys
//! - A wallet able to sign text messages
//! - Wall-clock time
//!
//! Every store and wallet call is a suspension point. Nothing here retries.

use crate::domain::value_objects::{PlayerAddress, WalletSignature};
use crate::errors::{SignerError, StoreError};
use async_trait::async_trait;

// =============================================================================
// REMOTE STORE
// =============================================================================

/// Interface to the remote key-value store holding index and records.
///
/// ## Implementation Notes
///
/// The adapter implementing this trait should:
/// 1. Return an empty byte vector from `get` when the key was never written
/// 2. Map a refused write (no authority, declined transaction) to
///    [`StoreError::Rejected`]
/// 3. Never interpret the bytes it stores
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Availability probe. `false` means every call is expected to fail.
    async fn is_available(&self) -> bool;

    /// Read the bytes under `key`.
    ///
    /// # Returns
    ///
    /// * Empty vector - If the key was never written
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Overwrite the bytes under `key`.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Address of this store instance, bound into disclosure challenges.
    async fn address(&self) -> Result<String, StoreError>;
}

// =============================================================================
// MESSAGE SIGNER (Wallet)
// =============================================================================

/// Interface to the caller's wallet.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// Address of the signing account.
    fn address(&self) -> PlayerAddress;

    /// Sign `message` with EIP-191 `personal_sign` semantics.
    ///
    /// # Errors
    ///
    /// * [`SignerError::Declined`] - The wallet holder refused
    /// * [`SignerError::Failed`] - Any other signing failure
    async fn sign_message(&self, message: &str) -> Result<WalletSignature, SignerError>;
}

// =============================================================================
// CLOCK
// =============================================================================

/// Source of wall-clock time.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;

    /// Seconds since the Unix epoch.
    fn now_secs(&self) -> u64 {
        self.now_millis() / 1000
    }
}
