//! Durable state module
//!
//! The portfolio snapshot and the atomic put/get-latest store boundary
//! that makes crash recovery sound.

mod snapshot;
mod store;

pub use snapshot::PortfolioSnapshot;
pub use store::{FileSnapshotStore, SnapshotStore, StoreError};
