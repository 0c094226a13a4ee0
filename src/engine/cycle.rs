//! The decision loop
//!
//! One cycle runs the full pipeline for the entire active asset set:
//! settle strategy returns, poll signals, recompute correlation and
//! weights, vote per asset, size, gate through the breaker, execute,
//! then checkpoint. Cycle N+1 never starts before cycle N's snapshot
//! write is confirmed.

use super::events::{CycleEvent, CycleRecord, EventLog};
use crate::allocator::{AdaptiveAllocator, AllocationWeights};
use crate::config::Config;
use crate::ensemble::{ConsensusDecision, EnsembleVoter, VoteOutcome};
use crate::error::EngineError;
use crate::execution::{
    CascadeDetector, ExecutionResult, ExecutionSimulator, ExecutionStatus, ImpactModel,
    OrderRequest, TimeOfDayModel,
};
use crate::market::{MarketDataSource, MarketSnapshot};
use crate::perf::{CorrelationMatrix, PerformanceTracker};
use crate::portfolio::Portfolio;
use crate::risk::{BreakerThresholds, CircuitBreaker, PositionSizer, SizingOutcome};
use crate::signal::{Asset, Direction, StrategyId, StrategyPool, StrategySignal};
use crate::state::SnapshotStore;
use crate::telemetry::{record_cycle_latency, set_gauge, GaugeMetric};
use rust_decimal::Decimal;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Lifecycle control from an external supervisor
///
/// Honored only at cycle boundaries so the crash-recovery invariant
/// holds: a cycle that started always finishes its snapshot write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Pause,
    Resume,
    Stop,
}

/// A signal-following return awaiting the next cycle's prices
struct PendingReturn {
    strategy_id: StrategyId,
    asset: Asset,
    sign: f64,
    ref_price: Decimal,
    fill_ratio: f64,
    slippage: f64,
}

/// The ensemble decision engine
pub struct Engine {
    config: Config,
    pool: StrategyPool,
    tracker: PerformanceTracker,
    allocator: AdaptiveAllocator,
    voter: EnsembleVoter,
    sizer: PositionSizer,
    breaker: CircuitBreaker,
    simulator: ExecutionSimulator,
    portfolio: Portfolio,
    store: Box<dyn SnapshotStore>,
    events: EventLog,
    weights: AllocationWeights,
    pending: Vec<PendingReturn>,
    cycle: u64,
}

impl Engine {
    /// Build an engine, resuming from the store's latest snapshot when
    /// one exists
    pub async fn new(
        config: Config,
        pool: StrategyPool,
        store: Box<dyn SnapshotStore>,
    ) -> Result<Self, EngineError> {
        validate_config(&config)?;

        let (portfolio, cycle, starting_equity) = match store.latest().await? {
            Some(snapshot) => {
                tracing::info!(
                    cycle = snapshot.cycle,
                    equity = %snapshot.equity,
                    "Resuming from recovered snapshot"
                );
                let equity = snapshot.equity;
                (Portfolio::from_snapshot(&snapshot), snapshot.cycle + 1, equity)
            }
            None => {
                tracing::info!(initial_cash = %config.engine.initial_cash, "Starting fresh");
                (
                    Portfolio::new(config.engine.initial_cash),
                    0,
                    config.engine.initial_cash,
                )
            }
        };

        let breaker = CircuitBreaker::new(
            BreakerThresholds {
                caution_pct: config.breaker.caution_pct,
                reduce_pct: config.breaker.reduce_pct,
                halt_pct: config.breaker.halt_pct,
                recovery_pct: config.breaker.recovery_pct,
            },
            starting_equity,
        );

        let simulator = ExecutionSimulator::new(
            ImpactModel::new(config.execution.impact_coefficient),
            TimeOfDayModel::new(
                config.execution.overnight_multiplier,
                config.execution.shoulder_multiplier,
            ),
            CascadeDetector::new(
                config.execution.cascade_trigger_ratio,
                config.execution.cascade_penalty_pct,
            ),
            config.execution.max_participation,
            config.execution.jitter_pct,
            config.execution.seed,
        );

        Ok(Self {
            tracker: PerformanceTracker::new(
                config.performance.window,
                config.performance.min_samples,
                config.performance.annualization,
            ),
            allocator: AdaptiveAllocator::new(
                config.allocator.alpha,
                config.allocator.max_delta,
                config.allocator.score_epsilon,
            ),
            voter: EnsembleVoter::new(config.voter.confidence_threshold),
            sizer: PositionSizer::new(
                config.sizing.kelly_fraction,
                config.sizing.min_position_pct,
                config.sizing.max_position_pct,
            ),
            breaker,
            simulator,
            portfolio,
            store,
            events: EventLog::new(),
            weights: AllocationWeights::new(),
            pending: vec![],
            cycle,
            config,
            pool,
        })
    }

    /// Current portfolio (read-only)
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Per-cycle event log (read-only)
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Circuit breaker (read-only)
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Last computed allocation weights
    pub fn weights(&self) -> &AllocationWeights {
        &self.weights
    }

    /// Performance tracker (read-only)
    pub fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    /// Mutable strategy pool, for enable/disable control
    pub fn pool_mut(&mut self) -> &mut StrategyPool {
        &mut self.pool
    }

    /// Next cycle counter
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Run the decision loop until stopped
    pub async fn run(
        &mut self,
        market: &mut dyn MarketDataSource,
        commands: &mut mpsc::Receiver<EngineCommand>,
    ) -> Result<(), EngineError> {
        let interval = Duration::from_secs(self.config.engine.cycle_interval_secs);
        let mut paused = false;

        loop {
            // Control requests are drained only here, between cycles
            while let Ok(command) = commands.try_recv() {
                match command {
                    EngineCommand::Stop => {
                        tracing::info!("Stop honored at cycle boundary");
                        return Ok(());
                    }
                    EngineCommand::Pause => paused = true,
                    EngineCommand::Resume => paused = false,
                }
            }

            if paused {
                tracing::info!("Paused; waiting for resume");
                match commands.recv().await {
                    Some(EngineCommand::Resume) => paused = false,
                    Some(EngineCommand::Pause) => {}
                    Some(EngineCommand::Stop) | None => return Ok(()),
                }
                continue;
            }

            let snapshot = market.snapshot();
            self.run_cycle(&snapshot).await?;
            tokio::time::sleep(interval).await;
        }
    }

    /// Execute one full decision cycle against a market snapshot
    pub async fn run_cycle(
        &mut self,
        market: &MarketSnapshot,
    ) -> Result<CycleRecord, EngineError> {
        let started = Instant::now();
        let now = market.timestamp;
        let mut record = CycleRecord::new(self.cycle, now);

        self.settle_pending_returns(market);

        let signals_by_asset = self.pool.poll(market);
        let active = self.pool.active_ids();

        let matrix =
            CorrelationMatrix::compute(&self.tracker, &active, self.config.correlation.min_overlap);
        self.weights = self.allocator.compute(&active, &self.tracker, &matrix);
        record.push(CycleEvent::WeightsComputed {
            weights: self.weights.clone(),
        });

        let equity = self.portfolio.equity(market);
        if let Some(transition) = self.breaker.evaluate(equity, now) {
            record.push(CycleEvent::BreakerTransition { transition });
        }

        // With no active strategies all weights are zero and consensus
        // is skipped for the cycle
        if !self.weights.is_empty() {
            let mut assets: Vec<Asset> = signals_by_asset.keys().cloned().collect();
            assets.sort();

            for asset in assets {
                let signals = &signals_by_asset[&asset];
                self.decide_and_execute(&asset, signals, &matrix, market, &mut record);
            }
        }

        let final_equity = self.portfolio.equity(market);
        set_gauge(GaugeMetric::Equity, decimal_to_f64(final_equity));
        set_gauge(
            GaugeMetric::DrawdownPct,
            decimal_to_f64(self.breaker.state().current_drawdown_pct),
        );
        set_gauge(
            GaugeMetric::BreakerLevel,
            self.breaker.level().as_u8() as f64,
        );
        set_gauge(GaugeMetric::ActiveStrategies, self.weights.len() as f64);

        let snapshot = self.portfolio.snapshot(self.cycle, final_equity, now);
        self.put_with_retry(&snapshot).await?;
        record.push(CycleEvent::SnapshotCommitted { cycle: self.cycle });

        self.events.append(record.clone());
        self.cycle += 1;
        record_cycle_latency(started.elapsed());
        Ok(record)
    }

    /// Vote, size, gate, and execute for one asset
    fn decide_and_execute(
        &mut self,
        asset: &str,
        signals: &[StrategySignal],
        matrix: &CorrelationMatrix,
        market: &MarketSnapshot,
        record: &mut CycleRecord,
    ) {
        let outcome = self.voter.vote(asset, signals, &self.weights);
        let decision = match outcome {
            VoteOutcome::Decision(decision) => {
                record.push(CycleEvent::ConsensusReached {
                    decision: decision.clone(),
                });
                decision
            }
            VoteOutcome::BelowThreshold {
                asset,
                aggregate_confidence,
            } => {
                tracing::debug!(%asset, aggregate_confidence, "Consensus below threshold");
                record.push(CycleEvent::NoDecision {
                    asset: asset.clone(),
                    aggregate_confidence: Some(aggregate_confidence),
                });
                self.register_pending(&asset, signals, None, market);
                return;
            }
            VoteOutcome::Tie { asset } => {
                record.push(CycleEvent::NoDecision {
                    asset: asset.clone(),
                    aggregate_confidence: None,
                });
                self.register_pending(&asset, signals, None, market);
                return;
            }
            VoteOutcome::NoSignals { .. } => return,
        };

        let penalty = consensus_penalty(matrix, &decision, signals, &self.weights);
        let equity = self.portfolio.equity(market);

        match self
            .sizer
            .size(&decision, penalty, equity, self.breaker.level())
        {
            SizingOutcome::Sized(size) if size.notional > Decimal::ZERO => {
                let Some(depth) = market.depth(asset) else {
                    tracing::warn!(asset, "No market depth this cycle; order skipped");
                    self.register_pending(asset, signals, None, market);
                    return;
                };

                let order = OrderRequest {
                    asset: asset.to_string(),
                    direction: size.direction,
                    notional: size.notional,
                };
                let result = self.simulator.execute(&order, depth, market.timestamp);

                if result.status == ExecutionStatus::Liquidated {
                    self.portfolio.flatten(asset, result.fill_price);
                } else {
                    self.portfolio.apply_execution(&result);
                }

                self.register_pending(asset, signals, Some(&result), market);
                record.push(CycleEvent::OrderExecuted { result });
            }
            SizingOutcome::Sized(_) => {
                // Breaker scaling or penalty reduced the size to zero
                self.register_pending(asset, signals, None, market);
            }
            SizingOutcome::BelowBreakEven { asset, confidence } => {
                record.push(CycleEvent::BelowBreakEven {
                    asset: asset.clone(),
                    confidence,
                });
                self.register_pending(&asset, signals, None, market);
            }
            SizingOutcome::Halted { asset, level } => {
                record.push(CycleEvent::OrderHalted {
                    asset: asset.clone(),
                    level,
                });
                self.register_pending(&asset, signals, None, market);
            }
        }
    }

    /// Record signal-following returns to settle next cycle
    ///
    /// Every directional signal is tracked against the price move it
    /// predicted. Strategies aligned with an executed order have their
    /// return scaled by the realized fill ratio and charged slippage;
    /// a rejected order credits zero.
    fn register_pending(
        &mut self,
        asset: &str,
        signals: &[StrategySignal],
        executed: Option<&ExecutionResult>,
        market: &MarketSnapshot,
    ) {
        let Some(ref_price) = market.price(asset) else {
            return;
        };

        for signal in signals.iter().filter(|s| s.direction != Direction::Flat) {
            let (fill_ratio, slippage) = match executed {
                Some(result) if result.direction == signal.direction => (
                    result.fill_ratio(),
                    f64::try_from(result.slippage_pct).unwrap_or(0.0),
                ),
                _ => (1.0, 0.0),
            };
            self.pending.push(PendingReturn {
                strategy_id: signal.strategy_id.clone(),
                asset: asset.to_string(),
                sign: signal.direction.sign(),
                ref_price,
                fill_ratio,
                slippage,
            });
        }
    }

    /// Settle last cycle's pending returns at current prices
    fn settle_pending_returns(&mut self, market: &MarketSnapshot) {
        let pending = std::mem::take(&mut self.pending);
        for p in pending {
            let Some(price) = market.price(&p.asset) else {
                continue;
            };
            if p.ref_price <= Decimal::ZERO {
                continue;
            }
            let gross =
                f64::try_from((price - p.ref_price) / p.ref_price).unwrap_or(0.0);
            let ret = p.sign * gross * p.fill_ratio - p.slippage;
            self.tracker.record_return(&p.strategy_id, ret);
        }
    }

    /// Persist the snapshot, retrying before the cycle may complete
    async fn put_with_retry(
        &self,
        snapshot: &crate::state::PortfolioSnapshot,
    ) -> Result<(), EngineError> {
        let attempts = self.config.state.put_retries.max(1);
        let backoff = Duration::from_millis(self.config.state.retry_backoff_ms);

        let mut last_err = None;
        for attempt in 1..=attempts {
            match self.store.put(snapshot).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Snapshot write failed");
                    last_err = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(EngineError::Persistence {
            attempts,
            source: last_err.expect("at least one attempt was made"),
        })
    }
}

/// Reject configurations the pipeline cannot run under
fn validate_config(config: &Config) -> Result<(), EngineError> {
    let threshold = config.voter.confidence_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(EngineError::Config(format!(
            "voter.confidence_threshold must be in [0, 1], got {threshold}"
        )));
    }
    if config.sizing.min_position_pct > config.sizing.max_position_pct {
        return Err(EngineError::Config(format!(
            "sizing.min_position_pct {} exceeds max_position_pct {}",
            config.sizing.min_position_pct, config.sizing.max_position_pct
        )));
    }
    if config.engine.initial_cash <= Decimal::ZERO {
        return Err(EngineError::Config(format!(
            "engine.initial_cash must be positive, got {}",
            config.engine.initial_cash
        )));
    }
    Ok(())
}

/// Allocation-weighted correlation penalty of the agreeing strategies
fn consensus_penalty(
    matrix: &CorrelationMatrix,
    decision: &ConsensusDecision,
    signals: &[StrategySignal],
    weights: &AllocationWeights,
) -> f64 {
    let mut sum = 0.0;
    let mut weight_total = 0.0;
    for signal in signals.iter().filter(|s| s.direction == decision.direction) {
        let w = weights.get(&signal.strategy_id).copied().unwrap_or(0.0);
        sum += w * matrix.penalty(&signal.strategy_id, weights);
        weight_total += w;
    }
    if weight_total > 0.0 {
        sum / weight_total
    } else {
        0.0
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    f64::try_from(value).unwrap_or(0.0)
}
