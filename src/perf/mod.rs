//! Performance tracking and correlation analysis
//!
//! Rolling return windows per strategy (Sharpe estimates) and the
//! pairwise correlation matrix used as an allocation penalty.

mod correlation;
mod tracker;

pub use correlation::CorrelationMatrix;
pub use tracker::PerformanceTracker;
