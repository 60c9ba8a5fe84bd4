//! # Domain Invariants
//!
//! Invariants that MUST hold for every write the registry performs.
//!
//! | Invariant | Where it matters |
//! |-----------|------------------|
//! | Index ids are unique | `append_to_index` |
//! | A transition changes `status` only | `reveal` / `complete` |
//! | Status never moves backwards or skips | `reveal` / `complete` |

use crate::domain::entities::Objective;
use crate::domain::lifecycle::is_allowed;
use std::collections::HashSet;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Every id appears at most once in the index.
#[must_use]
pub fn check_index_unique(ids: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().all(|id| seen.insert(id.as_str()))
}

/// All fields other than `status` are identical.
#[must_use]
pub fn check_fields_preserved(before: &Objective, after: &Objective) -> bool {
    after.with_status(before.status) == *before
}

/// `after.status` is the direct successor of `before.status`.
#[must_use]
pub fn check_status_advance(before: &Objective, after: &Objective) -> bool {
    is_allowed(before.status, after.status)
}

/// Check both transition invariants at once.
#[must_use]
pub fn check_transition_invariants(
    before: &Objective,
    after: &Objective,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if !check_fields_preserved(before, after) {
        violations.push(InvariantViolation::FieldsChanged {
            id: before.id.to_string(),
        });
    }

    if !check_status_advance(before, after) {
        violations.push(InvariantViolation::StatusNotAdvanced {
            id: before.id.to_string(),
            from: before.status.as_str(),
            to: after.status.as_str(),
        });
    }

    violations
}

/// A broken invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A transition touched something other than `status`.
    FieldsChanged {
        /// Objective id.
        id: String,
    },
    /// A transition did not move exactly one step forward.
    StatusNotAdvanced {
        /// Objective id.
        id: String,
        /// Previous status.
        from: &'static str,
        /// New status.
        to: &'static str,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldsChanged { id } => write!(f, "transition of {id} changed immutable fields"),
            Self::StatusNotAdvanced { id, from, to } => {
                write!(f, "transition of {id} from {from} to {to} is not a single step")
            }
        }
    }
}
