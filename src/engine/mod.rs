//! Decision engine module
//!
//! The per-cycle pipeline and the append-only event log it emits.

mod cycle;
mod events;

pub use cycle::{Engine, EngineCommand};
pub use events::{CycleEvent, CycleRecord, EventLog};
