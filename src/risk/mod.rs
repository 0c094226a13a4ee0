//! Risk management module
//!
//! Fractional-Kelly position sizing and the drawdown circuit breaker.

mod breaker;
mod kelly;
mod sizing;
mod types;

pub use breaker::{BreakerThresholds, CircuitBreaker};
pub use kelly::KellyCalculator;
pub use sizing::PositionSizer;
pub use types::{
    BreakerLevel, BreakerReason, BreakerTransition, CircuitBreakerState, PositionSize,
    SizingOutcome,
};
