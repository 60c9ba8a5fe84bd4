//! # Error Types
//!
//! All error types for the objective registry, one enum per layer.
//!
//! Malformed JSON read from the store is deliberately absent from this
//! taxonomy: the record store turns it into "absent" plus a diagnostic so
//! one corrupt record cannot fail a whole listing.

use crate::domain::entities::ObjectiveStatus;
use thiserror::Error;

// =============================================================================
// STORE ERRORS (Remote Store Port)
// =============================================================================

/// Errors reported by a remote key-value store implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store is not reachable or not ready.
    #[error("store unavailable")]
    Unavailable,

    /// The store refused a write (missing authority, declined signing, ...).
    #[error("write rejected: {0}")]
    Rejected(String),

    /// Any other transport-level failure.
    #[error("store transport error: {0}")]
    Transport(String),
}

// =============================================================================
// SIGNER ERRORS (Wallet Port)
// =============================================================================

/// Errors reported by a wallet when asked to sign a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// The wallet holder declined the request.
    #[error("user rejected the signature request")]
    Declined,

    /// The signing call itself failed.
    #[error("signing failed: {0}")]
    Failed(String),
}

// =============================================================================
// LIFECYCLE ERRORS (Pure Domain)
// =============================================================================

/// Errors from validating a lifecycle transition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// Caller is not the record owner.
    #[error("caller {caller} is not the owner {owner}")]
    Unauthorized {
        /// Address that attempted the transition.
        caller: String,
        /// Address recorded as owner.
        owner: String,
    },

    /// Current status is not the transition's source state.
    #[error("cannot move objective from {from} to {to}")]
    InvalidTransition {
        /// Status the record currently has.
        from: ObjectiveStatus,
        /// Status the caller asked for.
        to: ObjectiveStatus,
    },
}

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Errors surfaced by registry operations (create, list, get, transitions).
#[derive(Debug, Error, Clone)]
pub enum RegistryError {
    /// The remote store reported itself unavailable.
    #[error("objective store is unavailable")]
    StoreUnavailable,

    /// The remote store refused the write.
    #[error("write rejected: {0}")]
    WriteRejected(String),

    /// No record exists under the given id.
    #[error("objective not found: {0}")]
    NotFound(String),

    /// Caller is not the record owner.
    #[error("caller {caller} is not the owner {owner} of objective {id}")]
    Unauthorized {
        /// Objective id.
        id: String,
        /// Address that attempted the operation.
        caller: String,
        /// Address recorded as owner.
        owner: String,
    },

    /// Status precondition unmet.
    #[error("objective {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Objective id.
        id: String,
        /// Status the record currently has.
        from: ObjectiveStatus,
        /// Status the caller asked for.
        to: ObjectiveStatus,
    },

    /// Creation input rejected before touching the store.
    #[error("invalid objective: {0}")]
    InvalidObjective(String),

    /// Phase one of creation succeeded but the index append failed.
    ///
    /// The record under `id` exists in the store but is invisible to
    /// listings. Re-creating the objective is the recovery path.
    #[error("objective {id} was written but not indexed: {source}")]
    IndexNotUpdated {
        /// Id of the orphaned record.
        id: String,
        /// Failure of the index write.
        #[source]
        source: Box<RegistryError>,
    },

    /// A post-transition invariant did not hold; nothing was written.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),

    /// Other store failure.
    #[error("store error: {0}")]
    Store(String),
}

impl RegistryError {
    /// Returns true if re-issuing the same call may succeed.
    ///
    /// The core never retries on its own; this only informs the caller.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::StoreUnavailable | Self::WriteRejected(_) | Self::Store(_) => true,
            Self::IndexNotUpdated { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Returns true if the caller declined to authorise a write.
    #[must_use]
    pub fn is_user_rejection(&self) -> bool {
        match self {
            Self::WriteRejected(reason) => reason.contains("user rejected"),
            Self::IndexNotUpdated { source, .. } => source.is_user_rejection(),
            _ => false,
        }
    }

    pub(crate) fn from_lifecycle(id: &str, err: LifecycleError) -> Self {
        match err {
            LifecycleError::Unauthorized { caller, owner } => Self::Unauthorized {
                id: id.to_string(),
                caller,
                owner,
            },
            LifecycleError::InvalidTransition { from, to } => Self::InvalidTransition {
                id: id.to_string(),
                from,
                to,
            },
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => Self::StoreUnavailable,
            StoreError::Rejected(reason) => Self::WriteRejected(reason),
            StoreError::Transport(reason) => Self::Store(reason),
        }
    }
}

// =============================================================================
// DISCLOSURE ERRORS
// =============================================================================

/// Errors from the signature-gated disclosure flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisclosureError {
    /// Only the record owner may disclose.
    #[error("only the owner may disclose objective {id}")]
    Unauthorized {
        /// Objective id.
        id: String,
    },

    /// The wallet declined, failed, or produced a signature from another key.
    #[error("signature rejected: {0}")]
    SignatureRejected(String),

    /// The stored payload could not be decoded to a number.
    #[error("payload of objective {id} is not decodable")]
    MalformedData {
        /// Objective id.
        id: String,
    },

    /// The store address needed for the challenge could not be read.
    #[error("store error: {0}")]
    Store(String),
}

impl DisclosureError {
    /// Returns true if re-invoking disclosure may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SignatureRejected(_) | Self::Store(_))
    }
}

impl From<StoreError> for DisclosureError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<SignerError> for DisclosureError {
    fn from(err: SignerError) -> Self {
        Self::SignatureRejected(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
