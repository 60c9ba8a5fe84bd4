//! # Value Objects
//!
//! Immutable domain primitives for the objective registry.
//! These types represent concepts that are defined by their value, not identity.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// OBJECTIVE ID
// =============================================================================

/// Length of the random suffix appended to generated ids.
pub const ID_SUFFIX_LEN: usize = 7;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque, immutable objective identifier.
///
/// Generated ids look like `1718000000000-k3j9x0q`: the creation time in
/// Unix milliseconds, a dash, then seven random base-36 characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectiveId(String);

impl ObjectiveId {
    /// Wraps an existing id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh id from a millisecond timestamp and an RNG.
    pub fn generate<R: Rng + ?Sized>(now_millis: u64, rng: &mut R) -> Self {
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("{now_millis}-{suffix}"))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectiveId({})", self.0)
    }
}

impl fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectiveId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectiveId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// =============================================================================
// PLAYER ADDRESS
// =============================================================================

/// Wallet address identifying a player.
///
/// Stored verbatim (checksummed or not); equality for ownership purposes is
/// ASCII case-insensitive, see [`PlayerAddress::matches`].
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerAddress(String);

impl PlayerAddress {
    /// Wraps an address string.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Case-insensitive identity comparison.
    #[must_use]
    pub fn matches(&self, other: &PlayerAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// Returns true if no address is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display: `0x1234...abcd`.
    #[must_use]
    pub fn short(&self) -> String {
        if self.0.len() <= 12 || !self.0.is_ascii() {
            return self.0.clone();
        }
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Debug for PlayerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerAddress({})", self.0)
    }
}

impl fmt::Display for PlayerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerAddress {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}

// =============================================================================
// WALLET SIGNATURE (65 bytes)
// =============================================================================

/// Recoverable secp256k1 signature as produced by `personal_sign`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WalletSignature {
    /// R component (32 bytes).
    pub r: [u8; 32],
    /// S component (32 bytes).
    pub s: [u8; 32],
    /// Recovery byte (0, 1, 27 or 28).
    pub v: u8,
}

impl WalletSignature {
    /// Serialized length: r || s || v.
    pub const LEN: usize = 65;

    /// Parses `r || s || v`. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::LEN {
            return None;
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Some(Self { r, s, v: bytes[64] })
    }

    /// Serializes as `r || s || v`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// `0x`-prefixed hex encoding, the form wallets return.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Parses the `0x`-prefixed hex form.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let raw = hex::decode(s.strip_prefix("0x").unwrap_or(s)).ok()?;
        Self::from_slice(&raw)
    }
}

impl fmt::Debug for WalletSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletSignature({})", self.to_hex())
    }
}

// =============================================================================
// TESTS
// =============================================================================
