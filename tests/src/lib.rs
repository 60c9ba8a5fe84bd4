//! # Werewolf Objectives Test Suite
//!
//! Unified test crate for scenarios that cross module boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── lifecycle_flows.rs   # create → reveal → complete, ownership
//!     ├── store_faults.rs      # corrupt data, orphans, unavailable store
//!     ├── disclosure_flows.rs  # challenge, signing, signature policies
//!     └── app_flows.rs         # commands folded into presentation state
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p objective-tests
//!
//! # By category
//! cargo test -p objective-tests integration::store_faults
//!
//! # Benchmarks
//! cargo bench -p objective-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]
