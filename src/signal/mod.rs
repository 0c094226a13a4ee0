//! Strategy signal module
//!
//! Defines the signal data shape and the pluggable strategy boundary.
//! The engine depends only on `StrategySignal` values; strategy alpha
//! logic lives behind the `SignalSource` trait.

mod pool;
mod types;

pub use pool::StrategyPool;
pub use types::{Asset, Direction, StrategyId, StrategySignal};

use crate::market::MarketSnapshot;

/// Trait for strategy signal producers
///
/// Implementations are polled once per decision cycle. Returning an
/// empty vec abstains for the cycle.
pub trait SignalSource: Send + Sync {
    /// Stable strategy identifier
    fn id(&self) -> &str;
    /// Produce this cycle's signals given the current market snapshot
    fn poll(&mut self, market: &MarketSnapshot) -> Vec<StrategySignal>;
}
