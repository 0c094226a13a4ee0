//! Engine metrics

use std::time::Duration;

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Current marked equity
    Equity,
    /// Drawdown from peak equity
    DrawdownPct,
    /// Circuit breaker level (0-3)
    BreakerLevel,
    /// Active strategy count
    ActiveStrategies,
}

impl GaugeMetric {
    fn name(&self) -> &'static str {
        match self {
            GaugeMetric::Equity => "ensemble_equity",
            GaugeMetric::DrawdownPct => "ensemble_drawdown_pct",
            GaugeMetric::BreakerLevel => "ensemble_breaker_level",
            GaugeMetric::ActiveStrategies => "ensemble_active_strategies",
        }
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}

/// Record how long a decision cycle took
pub fn record_cycle_latency(duration: Duration) {
    metrics::histogram!("ensemble_cycle_latency_ms").record(duration.as_millis() as f64);
}
