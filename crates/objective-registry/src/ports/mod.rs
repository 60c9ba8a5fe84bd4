//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the objective registry.
//! These are the interfaces between the domain and the outside world.
//!
//! - **Driving Ports (Inbound)**: `ObjectiveRegistryApi`, `DisclosureApi`
//! - **Driven Ports (Outbound)**: `RemoteStore`, `MessageSigner`, `Clock`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
