//! # Application Layer
//!
//! Presentation state for a client of the registry.
//!
//! - `state`: [`AppState`], the [`AppEvent`]s that change it, and the pure
//!   [`reduce`] function
//! - `commands`: user intents ([`Command`]) and [`execute`], which runs one
//!   against the registry ports and returns events

pub mod commands;
pub mod state;

pub use commands::{execute, Command};
pub use state::{
    reduce, reduce_all, ActionLogEntry, AppEvent, AppState, Stats, StatusFilter,
    TransactionBanner, TransactionStatus, ACTION_LOG_CAPACITY,
};
