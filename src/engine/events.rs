//! Per-cycle event log
//!
//! Append-only, immutable records of everything a cycle decided:
//! allocation weights, consensus outcomes (including explicit
//! no-decision), breaker transitions, and execution results, keyed by
//! cycle and timestamp for external monitoring.

use crate::allocator::AllocationWeights;
use crate::ensemble::ConsensusDecision;
use crate::execution::ExecutionResult;
use crate::risk::{BreakerLevel, BreakerTransition};
use crate::signal::Asset;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged event within a cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CycleEvent {
    /// Weights computed for this cycle
    WeightsComputed { weights: AllocationWeights },
    /// Consensus reached for an asset
    ConsensusReached { decision: ConsensusDecision },
    /// Explicit no-decision outcome for an asset
    NoDecision {
        asset: Asset,
        aggregate_confidence: Option<f64>,
    },
    /// Sizing fail-safe: confidence below Kelly break-even
    BelowBreakEven { asset: Asset, confidence: f64 },
    /// New order blocked by the breaker halt
    OrderHalted { asset: Asset, level: BreakerLevel },
    /// Circuit breaker level change
    BreakerTransition { transition: BreakerTransition },
    /// Order executed (any terminal status)
    OrderExecuted { result: ExecutionResult },
    /// Snapshot durably written
    SnapshotCommitted { cycle: u64 },
}

/// All events of one cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    /// Cycle counter
    pub cycle: u64,
    /// Cycle start timestamp
    pub timestamp: DateTime<Utc>,
    /// Events in emission order
    pub events: Vec<CycleEvent>,
}

impl CycleRecord {
    /// Start an empty record for a cycle
    pub fn new(cycle: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            cycle,
            timestamp,
            events: vec![],
        }
    }

    /// Append an event
    pub fn push(&mut self, event: CycleEvent) {
        self.events.push(event);
    }
}

/// Append-only log of cycle records
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<CycleRecord>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed cycle's record
    pub fn append(&mut self, record: CycleRecord) {
        self.records.push(record);
    }

    /// Read-only view of all records
    pub fn records(&self) -> &[CycleRecord] {
        &self.records
    }

    /// Record for a specific cycle
    pub fn for_cycle(&self, cycle: u64) -> Option<&CycleRecord> {
        self.records.iter().find(|r| r.cycle == cycle)
    }
}
