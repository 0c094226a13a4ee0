//! Ensemble voting module
//!
//! Aggregates weighted strategy signals per asset into one
//! `ConsensusDecision` or an explicit no-decision outcome.

mod types;
mod voter;

pub use types::{ConsensusDecision, VoteOutcome};
pub use voter::EnsembleVoter;
