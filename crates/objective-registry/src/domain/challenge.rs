//! # Disclosure Challenge
//!
//! The message a wallet signs before the owner may see a decoded objective.
//! Five `label:value` lines joined by `\n`, in this fixed order, with no
//! trailing newline:
//!
//! ```text
//! publickey:<publicKeyHex>
//! contractAddresses:<storeAddress>
//! contractsChainId:<chainId>
//! startTimestamp:<unixSeconds>
//! durationDays:<integer>
//! ```

use rand::Rng;

/// Default validity window of a challenge, in days.
pub const DEFAULT_DURATION_DAYS: u32 = 30;

/// Hex digits in a generated public key (after the `0x` prefix).
pub const PUBLIC_KEY_HEX_DIGITS: usize = 2000;

const SECONDS_PER_DAY: u64 = 86_400;

/// Parameters bound into a disclosure challenge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisclosureChallenge {
    /// Public key material, `0x`-prefixed hex.
    pub public_key: String,
    /// Address of the store instance holding the records.
    pub store_address: String,
    /// Chain/network identifier.
    pub chain_id: u64,
    /// Start of the validity window, Unix seconds.
    pub start_timestamp: u64,
    /// Length of the validity window, in days.
    pub duration_days: u32,
}

impl DisclosureChallenge {
    /// Builds a challenge with a freshly generated public key.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        store_address: impl Into<String>,
        chain_id: u64,
        start_timestamp: u64,
        duration_days: u32,
    ) -> Self {
        Self {
            public_key: generate_public_key(rng),
            store_address: store_address.into(),
            chain_id,
            start_timestamp,
            duration_days,
        }
    }

    /// The exact text to sign. Deterministic in the fields.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "publickey:{}\ncontractAddresses:{}\ncontractsChainId:{}\nstartTimestamp:{}\ndurationDays:{}",
            self.public_key,
            self.store_address,
            self.chain_id,
            self.start_timestamp,
            self.duration_days
        )
    }

    /// End of the validity window, Unix seconds.
    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.start_timestamp
            .saturating_add(u64::from(self.duration_days).saturating_mul(SECONDS_PER_DAY))
    }
}

/// Random `0x`-prefixed hex string of [`PUBLIC_KEY_HEX_DIGITS`] digits.
pub fn generate_public_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = vec![0u8; PUBLIC_KEY_HEX_DIGITS / 2];
    rng.fill(bytes.as_mut_slice());
    format!("0x{}", hex::encode(bytes))
}
