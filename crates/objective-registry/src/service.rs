//! # Objective Service
//!
//! Application service that wires the domain to the driven ports and
//! implements the driving ports.
//!
//! ## Protocol
//!
//! - **Create** is two-phase: write `objective_<id>`, then append `<id>` to
//!   the index. A failure after phase one leaves an orphan record that no
//!   listing can reach; the error names it.
//! - **Transitions** read the record, validate ownership and source state in
//!   the domain, check invariants, then write the record back.
//! - **Disclosure** never writes. It asks the caller's wallet to sign a
//!   challenge and decodes the payload locally.
//!
//! No call is retried and no lock spans callers. Two concurrent creators race
//! on the index read-modify-write and the last writer wins.

use crate::adapters::clock::{FixedClock, SystemClock};
use crate::adapters::memory_store::InMemoryStore;
use crate::adapters::record_store::{
    RecordFetch, RecordStore, DEFAULT_INDEX_KEY, DEFAULT_RECORD_PREFIX,
};
use crate::domain::challenge::{DisclosureChallenge, DEFAULT_DURATION_DAYS};
use crate::domain::codec::{MarkerCodec, ObjectiveCodec};
use crate::domain::entities::{
    Disclosed, NewObjective, Objective, ObjectiveListing, ObjectiveStatus, SkippedRecord,
};
use crate::domain::invariants::check_transition_invariants;
use crate::domain::lifecycle::{apply_transition, Transition};
use crate::domain::services::recover_personal_signer;
use crate::domain::value_objects::{ObjectiveId, PlayerAddress};
use crate::errors::{DisclosureError, RegistryError};
use crate::metrics;
use crate::ports::inbound::{DisclosureApi, ObjectiveRegistryApi};
use crate::ports::outbound::{Clock, MessageSigner, RemoteStore};

use async_trait::async_trait;
use serde_json::Map;
use std::env;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// How a disclosure signature is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignaturePolicy {
    /// Any signature the wallet returns counts as consent.
    #[default]
    ConsentOnly,
    /// The signature must recover to the objective's owner.
    VerifySigner,
}

/// Objective service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Key holding the index.
    pub index_key: String,
    /// Prefix of record keys.
    pub record_prefix: String,
    /// Chain id bound into disclosure challenges.
    pub chain_id: u64,
    /// Validity window of disclosure challenges, in days.
    pub disclosure_window_days: u32,
    /// Disclosure signature handling.
    pub signature_policy: SignaturePolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            index_key: DEFAULT_INDEX_KEY.to_string(),
            record_prefix: DEFAULT_RECORD_PREFIX.to_string(),
            chain_id: 0,
            disclosure_window_days: DEFAULT_DURATION_DAYS,
            signature_policy: SignaturePolicy::ConsentOnly,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OBJ_CHAIN_ID`: Chain id in challenges (default: 0)
    /// - `OBJ_DISCLOSURE_DAYS`: Challenge validity window (default: 30)
    /// - `OBJ_VERIFY_SIGNATURES`: Recover and check the signer (default: false)
    ///
    /// Unparsable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            chain_id: env::var("OBJ_CHAIN_ID")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.chain_id),

            disclosure_window_days: env::var("OBJ_DISCLOSURE_DAYS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.disclosure_window_days),

            signature_policy: env::var("OBJ_VERIFY_SIGNATURES")
                .map(|v| {
                    if v.to_lowercase() == "true" || v == "1" {
                        SignaturePolicy::VerifySigner
                    } else {
                        SignaturePolicy::ConsentOnly
                    }
                })
                .unwrap_or(defaults.signature_policy),

            ..defaults
        }
    }
}

/// Statistics for the objective service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Objectives written and indexed.
    pub objectives_created: u64,
    /// Creations that failed before anything was written.
    pub creation_failures: u64,
    /// Creations that wrote a record but not the index.
    pub orphaned_records: u64,
    /// Transitions written.
    pub transitions_applied: u64,
    /// Transitions refused (owner, state, or store).
    pub transitions_rejected: u64,
    /// Disclosures that returned a value.
    pub disclosures_granted: u64,
    /// Disclosures that were refused.
    pub disclosures_refused: u64,
    /// Index entries skipped while listing.
    pub records_skipped: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

/// The objective registry service.
///
/// This service:
/// 1. Creates objectives under the index/record key protocol
/// 2. Lists and reads them, tolerating missing or corrupt records
/// 3. Applies owner-only lifecycle transitions
/// 4. Runs the signature-gated disclosure flow
pub struct ObjectiveService<S: RemoteStore, K: Clock = SystemClock> {
    /// Service configuration.
    config: ServiceConfig,
    /// Index/record protocol over the remote store.
    records: RecordStore<S>,
    /// Payload codec.
    codec: Arc<dyn ObjectiveCodec>,
    /// Time source for ids, timestamps and challenges.
    clock: Arc<K>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<S: RemoteStore> ObjectiveService<S, SystemClock> {
    /// Create a service on the system clock with the default codec.
    pub fn new(store: Arc<S>, config: ServiceConfig) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), config)
    }
}

impl<S: RemoteStore, K: Clock> ObjectiveService<S, K> {
    /// Create a service with an explicit clock.
    pub fn with_clock(store: Arc<S>, clock: Arc<K>, config: ServiceConfig) -> Self {
        let records = RecordStore::with_keys(
            store,
            config.index_key.clone(),
            config.record_prefix.clone(),
        );
        Self {
            config,
            records,
            codec: Arc::new(MarkerCodec::new()),
            clock,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Replace the payload codec.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn ObjectiveCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The record store adapter.
    pub fn records(&self) -> &RecordStore<S> {
        &self.records
    }

    /// The payload codec.
    pub fn codec(&self) -> &dyn ObjectiveCodec {
        self.codec.as_ref()
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    // =========================================================================
    // REGISTRY
    // =========================================================================

    /// Create a hidden objective owned by `caller`.
    #[instrument(skip(self, input), fields(caller = %caller, role = %input.role))]
    pub async fn create(
        &self,
        caller: &PlayerAddress,
        input: &NewObjective,
    ) -> Result<Objective, RegistryError> {
        if let Err(reason) = input.validate() {
            self.stats.write().await.creation_failures += 1;
            return Err(RegistryError::InvalidObjective(reason));
        }
        if caller.is_empty() {
            self.stats.write().await.creation_failures += 1;
            return Err(RegistryError::InvalidObjective(
                "caller address is required".to_string(),
            ));
        }

        let now_millis = self.clock.now_millis();
        let id = ObjectiveId::generate(now_millis, &mut rand::thread_rng());
        let objective = Objective {
            id,
            encoded_payload: self.codec.encode(input.code),
            created_at: i64::try_from(now_millis / 1000).unwrap_or(i64::MAX),
            owner: caller.clone(),
            role: input.role.clone(),
            status: ObjectiveStatus::Hidden,
            extra: Map::new(),
        };

        // Phase 1: record
        if let Err(e) = self.records.write_record(&objective).await {
            warn!(objective_id = %objective.id, error = %e, "Objective record not written");
            self.stats.write().await.creation_failures += 1;
            return Err(e);
        }

        // Phase 2: index
        if let Err(e) = self.records.append_to_index(&objective.id).await {
            error!(
                objective_id = %objective.id,
                error = %e,
                "Record written but index not updated; record is orphaned"
            );
            self.stats.write().await.orphaned_records += 1;
            return Err(RegistryError::IndexNotUpdated {
                id: objective.id.to_string(),
                source: Box::new(e),
            });
        }

        metrics::record_objective_created();
        self.stats.write().await.objectives_created += 1;
        info!(objective_id = %objective.id, "Objective created");

        Ok(objective)
    }

    /// Every objective reachable from the index, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<ObjectiveListing, RegistryError> {
        let ids = self.records.list_ids().await?;
        let mut listing = ObjectiveListing::default();

        for id in ids {
            match self.records.fetch_record(&id).await {
                Ok(RecordFetch::Found(objective)) => listing.objectives.push(objective),
                Ok(RecordFetch::Missing) => listing.skipped.push(SkippedRecord {
                    id,
                    reason: "record missing".to_string(),
                }),
                Ok(RecordFetch::Malformed(reason)) => listing.skipped.push(SkippedRecord {
                    id,
                    reason: format!("malformed record: {reason}"),
                }),
                Err(e) => {
                    warn!(objective_id = %id, error = %e, "Record unreadable, skipping");
                    listing.skipped.push(SkippedRecord {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        listing
            .objectives
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if !listing.skipped.is_empty() {
            metrics::record_records_skipped(listing.skipped.len());
            self.stats.write().await.records_skipped += listing.skipped.len() as u64;
        }

        debug!(
            loaded = listing.objectives.len(),
            skipped = listing.skipped.len(),
            "Objectives listed"
        );
        Ok(listing)
    }

    /// Read a single objective.
    #[instrument(skip(self), fields(objective_id = %id))]
    pub async fn get(&self, id: &ObjectiveId) -> Result<Objective, RegistryError> {
        self.records
            .read_record(id)
            .await?
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// hidden → revealed, owner only.
    pub async fn reveal(
        &self,
        caller: &PlayerAddress,
        id: &ObjectiveId,
    ) -> Result<Objective, RegistryError> {
        self.transition(caller, id, Transition::Reveal).await
    }

    /// revealed → completed, owner only.
    pub async fn complete(
        &self,
        caller: &PlayerAddress,
        id: &ObjectiveId,
    ) -> Result<Objective, RegistryError> {
        self.transition(caller, id, Transition::Complete).await
    }

    #[instrument(skip(self), fields(objective_id = %id, caller = %caller))]
    async fn transition(
        &self,
        caller: &PlayerAddress,
        id: &ObjectiveId,
        transition: Transition,
    ) -> Result<Objective, RegistryError> {
        let target = transition.target().as_str();

        let result = self.transition_inner(caller, id, transition).await;

        match &result {
            Ok(_) => {
                metrics::record_transition(target, "applied");
                self.stats.write().await.transitions_applied += 1;
                info!(to = target, "Objective transitioned");
            }
            Err(e) => {
                metrics::record_transition(target, "rejected");
                self.stats.write().await.transitions_rejected += 1;
                warn!(to = target, error = %e, "Transition refused");
            }
        }

        result
    }

    async fn transition_inner(
        &self,
        caller: &PlayerAddress,
        id: &ObjectiveId,
        transition: Transition,
    ) -> Result<Objective, RegistryError> {
        let current = self.get(id).await?;

        let updated = apply_transition(&current, caller, transition)
            .map_err(|e| RegistryError::from_lifecycle(id.as_str(), e))?;

        let violations = check_transition_invariants(&current, &updated);
        if !violations.is_empty() {
            let details: Vec<String> = violations.iter().map(ToString::to_string).collect();
            return Err(RegistryError::InvariantViolated(details.join("; ")));
        }

        self.records.write_record(&updated).await?;
        Ok(updated)
    }

    // =========================================================================
    // DISCLOSURE
    // =========================================================================

    /// Build a challenge bound to this store, the configured chain and now.
    #[instrument(skip(self))]
    pub async fn issue_challenge(&self) -> Result<DisclosureChallenge, DisclosureError> {
        let store_address = self.records.store().address().await.map_err(|e| {
            metrics::record_store_failure(&e);
            DisclosureError::from(e)
        })?;

        let challenge = DisclosureChallenge::generate(
            &mut rand::thread_rng(),
            store_address,
            self.config.chain_id,
            self.clock.now_secs(),
            self.config.disclosure_window_days,
        );

        debug!(
            store = %challenge.store_address,
            expires_at = challenge.expires_at(),
            "Disclosure challenge issued"
        );
        Ok(challenge)
    }

    /// Ask `signer` to sign `challenge`, then decode `objective`.
    #[instrument(
        skip(self, signer, challenge, objective),
        fields(objective_id = %objective.id, caller = %signer.address())
    )]
    pub async fn disclose(
        &self,
        signer: &dyn MessageSigner,
        challenge: &DisclosureChallenge,
        objective: &Objective,
    ) -> Result<Disclosed, DisclosureError> {
        let result = self.disclose_inner(signer, challenge, objective).await;

        match &result {
            Ok(_) => {
                metrics::record_disclosure("granted");
                self.stats.write().await.disclosures_granted += 1;
                info!("Objective disclosed to owner");
            }
            Err(e) => {
                metrics::record_disclosure(disclosure_outcome(e));
                self.stats.write().await.disclosures_refused += 1;
                warn!(error = %e, "Disclosure refused");
            }
        }

        result
    }

    async fn disclose_inner(
        &self,
        signer: &dyn MessageSigner,
        challenge: &DisclosureChallenge,
        objective: &Objective,
    ) -> Result<Disclosed, DisclosureError> {
        let caller = signer.address();
        if !objective.is_owned_by(&caller) {
            return Err(DisclosureError::Unauthorized {
                id: objective.id.to_string(),
            });
        }

        let message = challenge.message();
        let signature = signer.sign_message(&message).await?;

        if self.config.signature_policy == SignaturePolicy::VerifySigner {
            let recovered = recover_personal_signer(&message, &signature)
                .map_err(|e| DisclosureError::SignatureRejected(e.to_string()))?;
            if !recovered.matches(&objective.owner) {
                return Err(DisclosureError::SignatureRejected(format!(
                    "signed by {recovered}, expected {}",
                    objective.owner
                )));
            }
        }

        let value = self
            .codec
            .decode(&objective.encoded_payload)
            .ok_or_else(|| DisclosureError::MalformedData {
                id: objective.id.to_string(),
            })?;

        Ok(Disclosed {
            objective_id: objective.id.clone(),
            value,
        })
    }
}

fn disclosure_outcome(err: &DisclosureError) -> &'static str {
    match err {
        DisclosureError::Unauthorized { .. } => "unauthorized",
        DisclosureError::SignatureRejected(_) => "signature_rejected",
        DisclosureError::MalformedData { .. } => "malformed",
        DisclosureError::Store(_) => "store",
    }
}

/// Create a service over an empty in-memory store with a frozen clock.
pub fn create_test_service() -> ObjectiveService<InMemoryStore, FixedClock> {
    ObjectiveService::with_clock(
        Arc::new(InMemoryStore::new()),
        Arc::new(FixedClock::at_secs(1_718_000_000)),
        ServiceConfig::default(),
    )
}

// =============================================================================
// PORT IMPLEMENTATIONS
// =============================================================================

#[async_trait]
impl<S: RemoteStore, K: Clock> ObjectiveRegistryApi for ObjectiveService<S, K> {
    async fn create(
        &self,
        caller: &PlayerAddress,
        input: &NewObjective,
    ) -> Result<Objective, RegistryError> {
        ObjectiveService::create(self, caller, input).await
    }

    async fn list(&self) -> Result<ObjectiveListing, RegistryError> {
        ObjectiveService::list(self).await
    }

    async fn get(&self, id: &ObjectiveId) -> Result<Objective, RegistryError> {
        ObjectiveService::get(self, id).await
    }

    async fn reveal(
        &self,
        caller: &PlayerAddress,
        id: &ObjectiveId,
    ) -> Result<Objective, RegistryError> {
        ObjectiveService::reveal(self, caller, id).await
    }

    async fn complete(
        &self,
        caller: &PlayerAddress,
        id: &ObjectiveId,
    ) -> Result<Objective, RegistryError> {
        ObjectiveService::complete(self, caller, id).await
    }
}

#[async_trait]
impl<S: RemoteStore, K: Clock> DisclosureApi for ObjectiveService<S, K> {
    async fn issue_challenge(&self) -> Result<DisclosureChallenge, DisclosureError> {
        ObjectiveService::issue_challenge(self).await
    }

    async fn disclose(
        &self,
        signer: &dyn MessageSigner,
        challenge: &DisclosureChallenge,
        objective: &Objective,
    ) -> Result<Disclosed, DisclosureError> {
        ObjectiveService::disclose(self, signer, challenge, objective).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
