//! # Domain Services
//!
//! Pure functions for wallet signature handling.
//! These functions are deterministic and have no side effects.
//!
//! Wallets sign challenges with EIP-191 `personal_sign`:
//! `keccak256("\x19Ethereum Signed Message:\n" ++ len(message) ++ message)`.

use crate::domain::value_objects::{PlayerAddress, WalletSignature};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Why a signature could not be attributed to an address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    /// `v` is not 0, 1, 27 or 28.
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// r or s is not a valid scalar.
    #[error("invalid signature format")]
    InvalidFormat,

    /// No public key recovers from this signature and hash.
    #[error("public key recovery failed")]
    RecoveryFailed,
}

// =============================================================================
// HASHING
// =============================================================================

/// Keccak256 hash function.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// EIP-191 version 0x45 digest of a text message.
#[must_use]
pub fn personal_message_hash(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n");
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

// =============================================================================
// ADDRESSES
// =============================================================================

/// Derive the lowercase `0x` address of a public key.
#[must_use]
pub fn address_from_pubkey(public_key: &VerifyingKey) -> PlayerAddress {
    let pubkey_bytes = public_key.to_encoded_point(false);
    // Keccak256 of the uncompressed key without its 0x04 prefix
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);
    PlayerAddress::new(format!("0x{}", hex::encode(&hash[12..])))
}

/// Recover the address that produced a `personal_sign` signature over `message`.
pub fn recover_personal_signer(
    message: &str,
    signature: &WalletSignature,
) -> Result<PlayerAddress, RecoveryError> {
    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&sig_bytes).map_err(|_| RecoveryError::InvalidFormat)?;

    let hash = personal_message_hash(message);
    let recovered = VerifyingKey::recover_from_prehash(&hash, &sig, recovery_id)
        .map_err(|_| RecoveryError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered))
}

/// Parse recovery ID from v value.
///
/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, RecoveryError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(RecoveryError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| RecoveryError::InvalidRecoveryId(v))
}

// =============================================================================
// TESTS
// =============================================================================
