//! # Driving Ports (API - Inbound)
//!
//! These are the interfaces exposed by the objective registry.
//! A presentation layer (see [`crate::app`]) drives them.

use crate::domain::challenge::DisclosureChallenge;
use crate::domain::entities::{Disclosed, NewObjective, Objective, ObjectiveListing};
use crate::domain::value_objects::{ObjectiveId, PlayerAddress};
use crate::errors::{DisclosureError, RegistryError};
use crate::ports::outbound::MessageSigner;
use async_trait::async_trait;

// =============================================================================
// REGISTRY API
// =============================================================================

/// Create, read and transition objectives.
#[async_trait]
pub trait ObjectiveRegistryApi: Send + Sync {
    /// Create a hidden objective owned by `caller`.
    ///
    /// Two phases: the record is written, then its id is appended to the
    /// index. If the second phase fails the error is
    /// [`RegistryError::IndexNotUpdated`] naming the orphaned id.
    async fn create(
        &self,
        caller: &PlayerAddress,
        input: &NewObjective,
    ) -> Result<Objective, RegistryError>;

    /// Every objective reachable from the index, newest first.
    ///
    /// Missing or malformed records are reported in
    /// [`ObjectiveListing::skipped`] instead of failing the listing.
    async fn list(&self) -> Result<ObjectiveListing, RegistryError>;

    /// Read a single objective.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::NotFound`] - No readable record under `id`
    async fn get(&self, id: &ObjectiveId) -> Result<Objective, RegistryError>;

    /// hidden → revealed, owner only.
    async fn reveal(
        &self,
        caller: &PlayerAddress,
        id: &ObjectiveId,
    ) -> Result<Objective, RegistryError>;

    /// revealed → completed, owner only.
    async fn complete(
        &self,
        caller: &PlayerAddress,
        id: &ObjectiveId,
    ) -> Result<Objective, RegistryError>;
}

// =============================================================================
// DISCLOSURE API
// =============================================================================

/// Signature-gated recovery of an objective's plaintext value.
#[async_trait]
pub trait DisclosureApi: Send + Sync {
    /// Build a fresh challenge bound to this store and the current time.
    async fn issue_challenge(&self) -> Result<DisclosureChallenge, DisclosureError>;

    /// Ask `signer` to sign `challenge`, then decode `objective`.
    ///
    /// The caller is `signer.address()`. Never writes to the store.
    async fn disclose(
        &self,
        signer: &dyn MessageSigner,
        challenge: &DisclosureChallenge,
        objective: &Objective,
    ) -> Result<Disclosed, DisclosureError>;
}
