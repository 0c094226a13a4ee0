//! Telemetry module
//!
//! Structured logging and engine metrics.

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{record_cycle_latency, set_gauge, GaugeMetric};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level)
}
