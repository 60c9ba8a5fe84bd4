//! # Lifecycle State Machine
//!
//! Pure validation and application of status transitions.
//!
//! | From | To | Caller |
//! |------|----|--------|
//! | hidden | revealed | owner |
//! | revealed | completed | owner |
//!
//! Everything else is rejected. No transition skips a state or reverses.

use crate::domain::entities::{Objective, ObjectiveStatus};
use crate::domain::value_objects::PlayerAddress;
use crate::errors::LifecycleError;
use std::fmt;

/// A requested status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// hidden → revealed
    Reveal,
    /// revealed → completed
    Complete,
}

impl Transition {
    /// Status the record must currently have.
    #[must_use]
    pub const fn source(self) -> ObjectiveStatus {
        match self {
            Self::Reveal => ObjectiveStatus::Hidden,
            Self::Complete => ObjectiveStatus::Revealed,
        }
    }

    /// Status the record will have afterwards.
    #[must_use]
    pub const fn target(self) -> ObjectiveStatus {
        match self {
            Self::Reveal => ObjectiveStatus::Revealed,
            Self::Complete => ObjectiveStatus::Completed,
        }
    }

    /// The transition that leaves `status`, if any.
    #[must_use]
    pub const fn from_status(status: ObjectiveStatus) -> Option<Self> {
        match status {
            ObjectiveStatus::Hidden => Some(Self::Reveal),
            ObjectiveStatus::Revealed => Some(Self::Complete),
            ObjectiveStatus::Completed => None,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reveal => f.write_str("reveal"),
            Self::Complete => f.write_str("complete"),
        }
    }
}

/// Returns true if the table allows `from → to`.
#[must_use]
pub fn is_allowed(from: ObjectiveStatus, to: ObjectiveStatus) -> bool {
    from.successor() == Some(to)
}

/// Checks ownership, then the source state, and returns the updated record.
///
/// Ownership is checked first so a non-owner learns nothing about the state.
pub fn apply_transition(
    objective: &Objective,
    caller: &PlayerAddress,
    transition: Transition,
) -> Result<Objective, LifecycleError> {
    if !objective.is_owned_by(caller) {
        return Err(LifecycleError::Unauthorized {
            caller: caller.to_string(),
            owner: objective.owner.to_string(),
        });
    }

    if objective.status != transition.source() {
        return Err(LifecycleError::InvalidTransition {
            from: objective.status,
            to: transition.target(),
        });
    }

    Ok(objective.with_status(transition.target()))
}

/// The transition `caller` may perform on `objective` right now, if any.
///
/// Drives which action a client offers (Reveal / Complete / nothing).
#[must_use]
pub fn available_transition(objective: &Objective, caller: &PlayerAddress) -> Option<Transition> {
    if objective.is_owned_by(caller) {
        Transition::from_status(objective.status)
    } else {
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================
