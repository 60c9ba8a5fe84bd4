//! # Adapters Layer (Outer Hexagon)
//!
//! Adapters connect the registry to external systems.
//!
//! - `record_store` speaks the index/record key protocol over any `RemoteStore`
//! - `memory_store`, `wallet` and `clock` implement the driven ports in-process

pub mod clock;
pub mod memory_store;
pub mod record_store;
pub mod wallet;

pub use clock::*;
pub use memory_store::*;
pub use record_store::*;
pub use wallet::*;
