//! Configuration types for ensemble-engine

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub allocator: AllocatorConfig,
    #[serde(default)]
    pub voter: VoterConfig,
    #[serde(default)]
    pub sizing: SizingConfig,
    #[serde(default)]
    pub breaker: BreakerConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Decision loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Seconds between decision cycles
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
    /// Starting cash when no snapshot exists
    #[serde(default = "default_initial_cash")]
    pub initial_cash: Decimal,
}

fn default_cycle_interval_secs() -> u64 {
    60
}
fn default_initial_cash() -> Decimal {
    Decimal::new(10_000, 0)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: default_cycle_interval_secs(),
            initial_cash: default_initial_cash(),
        }
    }
}

/// Performance tracker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceConfig {
    /// Rolling return window capacity per strategy
    #[serde(default = "default_window")]
    pub window: usize,
    /// Minimum samples before Sharpe leaves its neutral default
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Annualization factor (cycles per year)
    #[serde(default = "default_annualization")]
    pub annualization: f64,
}

fn default_window() -> usize {
    64
}
fn default_min_samples() -> usize {
    8
}
fn default_annualization() -> f64 {
    252.0
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            min_samples: default_min_samples(),
            annualization: default_annualization(),
        }
    }
}

/// Correlation manager configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorrelationConfig {
    /// Minimum overlapping samples for a real correlation estimate
    #[serde(default = "default_min_overlap")]
    pub min_overlap: usize,
}

fn default_min_overlap() -> usize {
    8
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_overlap: default_min_overlap(),
        }
    }
}

/// Adaptive allocator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AllocatorConfig {
    /// Exponential smoothing factor on new weights
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Maximum weight change per cycle before renormalization
    #[serde(default = "default_max_delta")]
    pub max_delta: f64,
    /// Floor applied to negative raw scores
    #[serde(default = "default_score_epsilon")]
    pub score_epsilon: f64,
}

fn default_alpha() -> f64 {
    0.3
}
fn default_max_delta() -> f64 {
    0.15
}
fn default_score_epsilon() -> f64 {
    1e-4
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            max_delta: default_max_delta(),
            score_epsilon: default_score_epsilon(),
        }
    }
}

/// Ensemble voter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VoterConfig {
    /// Minimum aggregate confidence to emit a decision (inclusive)
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

fn default_confidence_threshold() -> f64 {
    0.55
}

impl Default for VoterConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

/// Position sizing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SizingConfig {
    /// Conservative multiplier on the Kelly-optimal fraction
    #[serde(default = "default_kelly_fraction")]
    pub kelly_fraction: f64,
    /// Position clamp floor as fraction of equity
    #[serde(default = "default_min_position_pct")]
    pub min_position_pct: Decimal,
    /// Position clamp ceiling as fraction of equity
    #[serde(default = "default_max_position_pct")]
    pub max_position_pct: Decimal,
}

fn default_kelly_fraction() -> f64 {
    0.25
}
fn default_min_position_pct() -> Decimal {
    Decimal::new(1, 2) // 0.01 = 1%
}
fn default_max_position_pct() -> Decimal {
    Decimal::new(15, 2) // 0.15 = 15%
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            kelly_fraction: default_kelly_fraction(),
            min_position_pct: default_min_position_pct(),
            max_position_pct: default_max_position_pct(),
        }
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BreakerConfig {
    /// Level 1 drawdown threshold
    #[serde(default = "default_caution_pct")]
    pub caution_pct: Decimal,
    /// Level 2 drawdown threshold (sizes halved)
    #[serde(default = "default_reduce_pct")]
    pub reduce_pct: Decimal,
    /// Level 3 drawdown threshold (new orders blocked)
    #[serde(default = "default_halt_pct")]
    pub halt_pct: Decimal,
    /// Hysteresis: reset to level 0 below this drawdown
    #[serde(default = "default_recovery_pct")]
    pub recovery_pct: Decimal,
}

fn default_caution_pct() -> Decimal {
    Decimal::new(5, 2) // 0.05
}
fn default_reduce_pct() -> Decimal {
    Decimal::new(10, 2) // 0.10
}
fn default_halt_pct() -> Decimal {
    Decimal::new(15, 2) // 0.15
}
fn default_recovery_pct() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            caution_pct: default_caution_pct(),
            reduce_pct: default_reduce_pct(),
            halt_pct: default_halt_pct(),
            recovery_pct: default_recovery_pct(),
        }
    }
}

/// Execution simulator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Market impact coefficient per unit of size/depth
    #[serde(default = "default_impact_coefficient")]
    pub impact_coefficient: Decimal,
    /// Friction multiplier during overnight hours
    #[serde(default = "default_overnight_multiplier")]
    pub overnight_multiplier: Decimal,
    /// Friction multiplier during open/close shoulders
    #[serde(default = "default_shoulder_multiplier")]
    pub shoulder_multiplier: Decimal,
    /// Fraction of one-sided depth fillable per order
    #[serde(default = "default_max_participation")]
    pub max_participation: Decimal,
    /// Order/depth ratio that triggers a liquidation cascade
    #[serde(default = "default_cascade_trigger_ratio")]
    pub cascade_trigger_ratio: Decimal,
    /// Price penalty on cascade-forced flattening
    #[serde(default = "default_cascade_penalty_pct")]
    pub cascade_penalty_pct: Decimal,
    /// Uniform random slippage jitter bound
    #[serde(default = "default_jitter_pct")]
    pub jitter_pct: f64,
    /// RNG seed for reproducible runs
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_impact_coefficient() -> Decimal {
    Decimal::new(10, 2) // 0.10
}
fn default_overnight_multiplier() -> Decimal {
    Decimal::new(15, 1) // 1.5
}
fn default_shoulder_multiplier() -> Decimal {
    Decimal::new(12, 1) // 1.2
}
fn default_max_participation() -> Decimal {
    Decimal::new(25, 2) // 0.25
}
fn default_cascade_trigger_ratio() -> Decimal {
    Decimal::new(5, 1) // 0.5
}
fn default_cascade_penalty_pct() -> Decimal {
    Decimal::new(5, 2) // 0.05
}
fn default_jitter_pct() -> f64 {
    0.0005
}
fn default_seed() -> u64 {
    42
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            impact_coefficient: default_impact_coefficient(),
            overnight_multiplier: default_overnight_multiplier(),
            shoulder_multiplier: default_shoulder_multiplier(),
            max_participation: default_max_participation(),
            cascade_trigger_ratio: default_cascade_trigger_ratio(),
            cascade_penalty_pct: default_cascade_penalty_pct(),
            jitter_pct: default_jitter_pct(),
            seed: default_seed(),
        }
    }
}

/// Snapshot store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// Directory for snapshot files
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    /// Write retry attempts before the cycle fails
    #[serde(default = "default_put_retries")]
    pub put_retries: u32,
    /// Backoff between write retries
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("./state")
}
fn default_put_retries() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    250
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            put_retries: default_put_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.voter.confidence_threshold, 0.55);
        assert_eq!(config.sizing.kelly_fraction, 0.25);
        assert_eq!(config.sizing.min_position_pct, dec!(0.01));
        assert_eq!(config.sizing.max_position_pct, dec!(0.15));
        assert_eq!(config.breaker.halt_pct, dec!(0.15));
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [engine]
            cycle_interval_secs = 30
            initial_cash = 5000.0

            [performance]
            window = 128
            min_samples = 16
            annualization = 365.0

            [allocator]
            alpha = 0.5

            [voter]
            confidence_threshold = 0.60

            [sizing]
            kelly_fraction = 0.20
            min_position_pct = 0.02
            max_position_pct = 0.10

            [breaker]
            caution_pct = 0.04
            reduce_pct = 0.08
            halt_pct = 0.12
            recovery_pct = 0.01

            [execution]
            seed = 7

            [state]
            snapshot_dir = "/tmp/snapshots"
            put_retries = 5

            [telemetry]
            log_level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.engine.cycle_interval_secs, 30);
        assert_eq!(config.performance.window, 128);
        assert_eq!(config.allocator.alpha, 0.5);
        // Unspecified fields in a present section fall back per-field
        assert_eq!(config.allocator.max_delta, 0.15);
        assert_eq!(config.voter.confidence_threshold, 0.60);
        assert_eq!(config.breaker.reduce_pct, dec!(0.08));
        assert_eq!(config.execution.seed, 7);
        assert_eq!(config.state.put_retries, 5);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }
}
