//! # Objective Registry - Werewolf Secret Objectives
//!
//! **Crate:** objective-registry
//! **Status:** Reference implementation with in-memory adapters
//!
//! ## Purpose
//!
//! Stores per-player secret objectives as encoded blobs in a flat key-value
//! store, lists them through a maintained index, moves each one through an
//! owner-only lifecycle, and discloses a value to its owner after a wallet
//! signature.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Every created record is appended to the index | `service.rs` - two-phase `create()` |
//! | Index ids are unique | `adapters/record_store.rs` - `append_to_index()` |
//! | Status only moves hidden → revealed → completed | `domain/lifecycle.rs` - `apply_transition()` |
//! | Only the owner transitions or discloses | `domain/lifecycle.rs`, `service.rs` - `disclose()` |
//! | A transition changes `status` only | `domain/invariants.rs` - `check_transition_invariants()` |
//! | Disclosure never writes | `service.rs` - `disclose()` |
//!
//! ## Storage Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `objective_keys` | JSON array of ids |
//! | `objective_<id>` | `{ "data", "timestamp", "playerAddress", "role", "status" }` |
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose | Bundled adapter |
//! |------|---------|-----------------|
//! | `RemoteStore` | `get` / `set` / availability / address | `InMemoryStore` |
//! | `MessageSigner` | EIP-191 message signing | `LocalWallet` |
//! | `Clock` | ids, timestamps, challenges | `SystemClock`, `FixedClock` |
//!
//! ## Security
//!
//! The bundled [`domain::codec::MarkerCodec`] is an encoding, not encryption.
//! Anyone who can read the store can read every objective.
//!
//! ## Usage Example
//!
//! ```ignore
//! use objective_registry::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let service = ObjectiveService::new(store, ServiceConfig::from_env());
//! let wallet = LocalWallet::random();
//!
//! let created = service.create(&wallet.address(), &NewObjective::new("Seer", 4.0)).await?;
//! service.reveal(&wallet.address(), &created.id).await?;
//!
//! let challenge = service.issue_challenge().await?;
//! let disclosed = service.disclose(&wallet, &challenge, &created).await?;
//! println!("{}", disclosed.description());
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod app;
pub mod domain;
pub mod errors;
pub mod metrics;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        Disclosed, NewObjective, Objective, ObjectiveListing, ObjectiveRecord, ObjectiveStatus,
        SkippedRecord,
    };

    // Value objects
    pub use crate::domain::value_objects::{ObjectiveId, PlayerAddress, WalletSignature};

    // Domain logic
    pub use crate::domain::catalog::{describe_objective, STANDARD_ROLES};
    pub use crate::domain::challenge::DisclosureChallenge;
    pub use crate::domain::codec::{MarkerCodec, ObjectiveCodec};
    pub use crate::domain::lifecycle::{apply_transition, available_transition, Transition};
    pub use crate::domain::services::recover_personal_signer;

    // Ports
    pub use crate::ports::inbound::{DisclosureApi, ObjectiveRegistryApi};
    pub use crate::ports::outbound::{Clock, MessageSigner, RemoteStore};

    // Errors
    pub use crate::errors::{
        DisclosureError, LifecycleError, RegistryError, SignerError, StoreError,
    };

    // Adapters
    pub use crate::adapters::{
        FixedClock, InMemoryStore, LocalWallet, RecordStore, SystemClock,
    };

    // Service
    pub use crate::service::{
        create_test_service, ObjectiveService, ServiceConfig, ServiceStats, SignaturePolicy,
    };

    // Presentation state
    pub use crate::app::{execute, reduce, AppEvent, AppState, Command, StatusFilter};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component name used in logs.
pub const COMPONENT_NAME: &str = "objective-registry";

// =============================================================================
// TESTS
// =============================================================================
