//! Presentation state and its reducer.
//!
//! The presentation layer owns one [`AppState`] and changes it only by
//! folding [`AppEvent`]s through [`reduce`]. The reducer performs no I/O and
//! reads no clock: timestamps arrive inside the events.

use crate::domain::entities::{Disclosed, Objective, ObjectiveListing, ObjectiveStatus};
use crate::domain::value_objects::ObjectiveId;
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt;

/// Maximum number of entries kept in the action log.
pub const ACTION_LOG_CAPACITY: usize = 10;

// =============================================================================
// FILTERS
// =============================================================================

/// Status filter applied to the visible list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every status.
    #[default]
    All,
    /// A single status.
    Only(ObjectiveStatus),
}

impl StatusFilter {
    /// Returns true if `status` passes the filter.
    #[must_use]
    pub fn accepts(self, status: ObjectiveStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// Per-status counts over all loaded objectives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// All loaded objectives.
    pub total: usize,
    /// Objectives still hidden.
    pub hidden: usize,
    /// Objectives revealed but not completed.
    pub revealed: usize,
    /// Objectives completed.
    pub completed: usize,
}

// =============================================================================
// ACTION LOG / BANNER
// =============================================================================

/// One line of the user-facing action log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLogEntry {
    /// When the action happened.
    pub at: DateTime<Local>,
    /// What happened.
    pub message: String,
}

impl ActionLogEntry {
    /// Entry stamped with `at`.
    pub fn new(at: DateTime<Local>, message: impl Into<String>) -> Self {
        Self {
            at,
            message: message.into(),
        }
    }

    /// Entry stamped with the current local time.
    pub fn now(message: impl Into<String>) -> Self {
        Self::new(Local::now(), message)
    }
}

impl fmt::Display for ActionLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Progress of the last write the user started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Submitted, no outcome yet.
    Pending,
    /// Write confirmed.
    Success,
    /// Write failed; the banner message says why.
    Error,
}

/// Banner shown while and after a write runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBanner {
    /// Where the write stands.
    pub status: TransactionStatus,
    /// Text shown to the user.
    pub message: String,
}

// =============================================================================
// EVENTS
// =============================================================================

/// Everything that can change [`AppState`].
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A refresh started.
    RefreshStarted,
    /// A fresh listing replaces the loaded objectives.
    ListingLoaded(ObjectiveListing),
    /// A refresh failed; loaded objectives are kept.
    RefreshFailed,
    /// A single objective changed (or appeared).
    ObjectiveUpdated(Objective),
    /// Search text changed.
    SearchChanged(String),
    /// Status filter changed.
    FilterChanged(StatusFilter),
    /// An objective was opened.
    Selected(ObjectiveId),
    /// The open objective was closed. Clears any decrypted value.
    SelectionCleared,
    /// A disclosure succeeded.
    Decrypted(Disclosed),
    /// The decrypted value was hidden again.
    DecryptionHidden,
    /// A write started.
    TransactionStarted(String),
    /// A write finished.
    TransactionSucceeded(String),
    /// A write failed.
    TransactionFailed(String),
    /// The banner was dismissed.
    TransactionDismissed,
    /// Append to the action log.
    ActionLogged(ActionLogEntry),
}

// =============================================================================
// STATE
// =============================================================================

/// Presentation state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Loaded objectives, newest first.
    pub objectives: Vec<Objective>,
    /// Index entries skipped by the last listing.
    pub skipped: usize,
    /// A refresh is in flight.
    pub refreshing: bool,
    /// Case-insensitive search over id and role.
    pub search: String,
    /// Status filter.
    pub status_filter: StatusFilter,
    /// Newest first, at most [`ACTION_LOG_CAPACITY`] entries.
    pub action_log: VecDeque<ActionLogEntry>,
    /// Objective currently open.
    pub selected: Option<ObjectiveId>,
    /// Plaintext of the open objective. Never persisted.
    pub decrypted: Option<Disclosed>,
    /// Current banner, if any.
    pub transaction: Option<TransactionBanner>,
}

impl AppState {
    /// Empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Objectives passing both the search and the status filter.
    #[must_use]
    pub fn visible(&self) -> Vec<&Objective> {
        let needle = self.search.to_lowercase();
        self.objectives
            .iter()
            .filter(|o| self.status_filter.accepts(o.status))
            .filter(|o| {
                needle.is_empty()
                    || o.id.as_str().to_lowercase().contains(&needle)
                    || o.role.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Counts over all loaded objectives, ignoring filters.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.objectives.iter().fold(
            Stats {
                total: self.objectives.len(),
                ..Stats::default()
            },
            |mut stats, o| {
                match o.status {
                    ObjectiveStatus::Hidden => stats.hidden += 1,
                    ObjectiveStatus::Revealed => stats.revealed += 1,
                    ObjectiveStatus::Completed => stats.completed += 1,
                }
                stats
            },
        )
    }

    /// Look up a loaded objective.
    #[must_use]
    pub fn objective(&self, id: &ObjectiveId) -> Option<&Objective> {
        self.objectives.iter().find(|o| &o.id == id)
    }

    /// The open objective, if it is loaded.
    #[must_use]
    pub fn selected_objective(&self) -> Option<&Objective> {
        self.selected.as_ref().and_then(|id| self.objective(id))
    }

    /// Action log lines, newest first, formatted `[HH:MM:SS] message`.
    #[must_use]
    pub fn log_lines(&self) -> Vec<String> {
        self.action_log.iter().map(ToString::to_string).collect()
    }
}

/// Fold one event into the state.
#[must_use]
pub fn reduce(mut state: AppState, event: AppEvent) -> AppState {
    match event {
        AppEvent::RefreshStarted => state.refreshing = true,
        AppEvent::ListingLoaded(listing) => {
            state.objectives = listing.objectives;
            state
                .objectives
                .sort_by(|a, b| b.created_at.cmp(&a.created_at));
            state.skipped = listing.skipped.len();
            state.refreshing = false;
        }
        AppEvent::RefreshFailed => state.refreshing = false,
        AppEvent::ObjectiveUpdated(objective) => {
            match state.objectives.iter_mut().find(|o| o.id == objective.id) {
                Some(existing) => *existing = objective,
                None => {
                    state.objectives.push(objective);
                    state
                        .objectives
                        .sort_by(|a, b| b.created_at.cmp(&a.created_at));
                }
            }
        }
        AppEvent::SearchChanged(search) => state.search = search,
        AppEvent::FilterChanged(filter) => state.status_filter = filter,
        AppEvent::Selected(id) => {
            if state.selected.as_ref() != Some(&id) {
                state.decrypted = None;
            }
            state.selected = Some(id);
        }
        AppEvent::SelectionCleared => {
            state.selected = None;
            state.decrypted = None;
        }
        AppEvent::Decrypted(disclosed) => state.decrypted = Some(disclosed),
        AppEvent::DecryptionHidden => state.decrypted = None,
        AppEvent::TransactionStarted(message) => {
            state.transaction = Some(TransactionBanner {
                status: TransactionStatus::Pending,
                message,
            });
        }
        AppEvent::TransactionSucceeded(message) => {
            state.transaction = Some(TransactionBanner {
                status: TransactionStatus::Success,
                message,
            });
        }
        AppEvent::TransactionFailed(message) => {
            state.transaction = Some(TransactionBanner {
                status: TransactionStatus::Error,
                message,
            });
        }
        AppEvent::TransactionDismissed => state.transaction = None,
        AppEvent::ActionLogged(entry) => {
            state.action_log.push_front(entry);
            state.action_log.truncate(ACTION_LOG_CAPACITY);
        }
    }
    state
}

/// Fold a batch of events in order.
#[must_use]
pub fn reduce_all(state: AppState, events: impl IntoIterator<Item = AppEvent>) -> AppState {
    events.into_iter().fold(state, reduce)
}

// =============================================================================
// TESTS
// =============================================================================
