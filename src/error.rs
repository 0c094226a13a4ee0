//! Engine error taxonomy
//!
//! Only operational failures are errors. Cold-start data insufficiency
//! resolves to neutral defaults, and expected no-trade outcomes are
//! modeled as `VoteOutcome`/`SizingOutcome` variants, so monitoring can
//! tell normal caution from actual failure.

use crate::state::StoreError;
use thiserror::Error;

/// Operational engine failures
#[derive(Debug, Error)]
pub enum EngineError {
    /// Snapshot write could not be confirmed; fatal to the cycle. The
    /// engine must not advance on an unconfirmed write.
    #[error("snapshot persistence failed after {attempts} attempts: {source}")]
    Persistence {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    /// Recovery read failed on startup
    #[error("state recovery failed: {0}")]
    Recovery(#[from] StoreError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}
