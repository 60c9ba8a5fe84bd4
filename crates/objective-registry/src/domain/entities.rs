//! # Core Domain Entities
//!
//! The objective record, its persisted JSON shape, and the inputs and outputs
//! of registry operations.

use crate::domain::catalog::describe_objective;
use crate::domain::value_objects::{ObjectiveId, PlayerAddress};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// OBJECTIVE STATUS
// =============================================================================

/// Lifecycle status of an objective. Monotonic: hidden → revealed → completed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveStatus {
    /// Initial state, set at creation.
    #[default]
    Hidden,
    /// Owner has announced the objective.
    Revealed,
    /// Terminal state.
    Completed,
}

impl ObjectiveStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Hidden, Self::Revealed, Self::Completed];

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Revealed => "revealed",
            Self::Completed => "completed",
        }
    }

    /// The only status this one may advance to, if any.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Hidden => Some(Self::Revealed),
            Self::Revealed => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Returns true for the terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Position in the lifecycle, used for monotonicity checks.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Hidden => 0,
            Self::Revealed => 1,
            Self::Completed => 2,
        }
    }
}

impl fmt::Display for ObjectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectiveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown objective status: {s}"))
    }
}

// =============================================================================
// OBJECTIVE RECORD (persisted JSON shape)
// =============================================================================

/// The JSON document stored under `objective_<id>`.
///
/// `status` reads as `hidden` when absent, `null` or blank. Unknown fields are kept in
/// `extra` so a transition writes them back untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveRecord {
    /// Codec output for the objective code.
    pub data: String,
    /// Creation time, Unix seconds.
    pub timestamp: i64,
    /// Creator's wallet address.
    pub player_address: PlayerAddress,
    /// Free-text role.
    pub role: String,
    /// Lifecycle status.
    #[serde(default, deserialize_with = "status_or_hidden")]
    pub status: ObjectiveStatus,
    /// Fields this version does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn status_or_hidden<'de, D>(deserializer: D) -> Result<ObjectiveStatus, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(ObjectiveStatus::Hidden),
        Some(raw) if raw.trim().is_empty() => Ok(ObjectiveStatus::Hidden),
        Some(raw) => raw.parse().map_err(D::Error::custom),
    }
}

// =============================================================================
// OBJECTIVE
// =============================================================================

/// A secret objective as seen by the registry.
#[derive(Clone, Debug, PartialEq)]
pub struct Objective {
    /// Immutable id.
    pub id: ObjectiveId,
    /// Codec token; never changed after creation.
    pub encoded_payload: String,
    /// Creation time, Unix seconds.
    pub created_at: i64,
    /// Creator; all ownership checks compare against this.
    pub owner: PlayerAddress,
    /// Free-text role chosen at creation.
    pub role: String,
    /// Lifecycle status.
    pub status: ObjectiveStatus,
    /// Unrecognised record fields, preserved across transitions.
    pub extra: Map<String, Value>,
}

impl Objective {
    /// Builds the domain view of a stored record.
    #[must_use]
    pub fn from_record(id: ObjectiveId, record: ObjectiveRecord) -> Self {
        Self {
            id,
            encoded_payload: record.data,
            created_at: record.timestamp,
            owner: record.player_address,
            role: record.role,
            status: record.status,
            extra: record.extra,
        }
    }

    /// Produces the JSON shape to persist.
    #[must_use]
    pub fn to_record(&self) -> ObjectiveRecord {
        ObjectiveRecord {
            data: self.encoded_payload.clone(),
            timestamp: self.created_at,
            player_address: self.owner.clone(),
            role: self.role.clone(),
            status: self.status,
            extra: self.extra.clone(),
        }
    }

    /// Returns a copy with only `status` changed.
    #[must_use]
    pub fn with_status(&self, status: ObjectiveStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Returns true if `caller` owns this objective.
    #[must_use]
    pub fn is_owned_by(&self, caller: &PlayerAddress) -> bool {
        self.owner.matches(caller)
    }
}

// =============================================================================
// OPERATION INPUTS / OUTPUTS
// =============================================================================

/// Input for creating an objective.
#[derive(Clone, Debug, PartialEq)]
pub struct NewObjective {
    /// Free-text role, required.
    pub role: String,
    /// Numeric objective code, required (finite and non-zero).
    pub code: f64,
    /// Optional free-text note. Shown in the creation form only; never stored.
    pub description: String,
}

impl NewObjective {
    /// Creates an input with an empty description.
    #[must_use]
    pub fn new(role: impl Into<String>, code: f64) -> Self {
        Self {
            role: role.into(),
            code,
            description: String::new(),
        }
    }

    /// Checks the required fields.
    pub fn validate(&self) -> Result<(), String> {
        if self.role.trim().is_empty() {
            return Err("role is required".to_string());
        }
        if !self.code.is_finite() {
            return Err(format!("objective code must be a finite number, got {}", self.code));
        }
        if self.code == 0.0 {
            return Err("objective code is required".to_string());
        }
        Ok(())
    }
}

/// An index entry whose record could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Id listed in the index.
    pub id: ObjectiveId,
    /// Human-readable diagnostic.
    pub reason: String,
}

/// Result of listing the registry: best-effort, newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectiveListing {
    /// Loaded objectives sorted by `created_at` descending.
    pub objectives: Vec<Objective>,
    /// Index entries that were missing or malformed.
    pub skipped: Vec<SkippedRecord>,
}

/// Plaintext recovered by a successful disclosure. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Disclosed {
    /// Objective the value belongs to.
    pub objective_id: ObjectiveId,
    /// Decoded objective code.
    pub value: f64,
}

impl Disclosed {
    /// Catalog description of the decoded code.
    #[must_use]
    pub fn description(&self) -> &'static str {
        describe_objective(self.value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
