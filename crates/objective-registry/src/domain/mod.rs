//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for the objective registry.
//! NO I/O, NO async.
//!
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).
//! - The lifecycle table, codec, challenge format and signature recovery all
//!   live here so they can be tested without a store or a wallet.

pub mod catalog;
pub mod challenge;
pub mod codec;
pub mod entities;
pub mod invariants;
pub mod lifecycle;
pub mod services;
pub mod value_objects;

pub use catalog::*;
pub use challenge::*;
pub use codec::*;
pub use entities::*;
pub use invariants::*;
pub use lifecycle::*;
pub use services::*;
pub use value_objects::*;
