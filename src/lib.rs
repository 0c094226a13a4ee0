//! ensemble-engine: risk-aware multi-strategy trading controller
//!
//! This library provides the core components for:
//! - Pluggable strategy signal ingestion
//! - Performance tracking and rolling correlation analysis
//! - Adaptive, correlation-penalized weight allocation
//! - Weighted ensemble voting into consensus decisions
//! - Fractional-Kelly position sizing with absolute caps
//! - A drawdown circuit breaker gating all sizing
//! - Simulated execution with spread, impact, partial fills, and
//!   liquidation cascades
//! - Atomic portfolio snapshots with crash recovery

pub mod allocator;
pub mod cli;
pub mod config;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod execution;
pub mod market;
pub mod perf;
pub mod portfolio;
pub mod risk;
pub mod signal;
pub mod state;
pub mod telemetry;
