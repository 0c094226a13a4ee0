//! Execution simulation module
//!
//! Models the friction a real order would meet: spread, market impact,
//! time-of-day liquidity, partial fills, and liquidation cascades.

mod cascade;
mod friction;
mod simulator;
mod types;

pub use cascade::CascadeDetector;
pub use friction::{spread_cost, ImpactModel, TimeOfDayModel};
pub use simulator::ExecutionSimulator;
pub use types::{ExecutionResult, ExecutionStatus, OrderId, OrderRequest};
