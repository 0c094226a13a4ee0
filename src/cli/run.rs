//! Run command implementation

use crate::config::Config;
use crate::engine::{Engine, EngineCommand};
use crate::market::{MarketDataSource, MarketSnapshot, RandomWalkMarket};
use crate::signal::{Direction, SignalSource, StrategyPool, StrategySignal};
use crate::state::FileSnapshotStore;
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal_macros::dec;
use tokio::sync::mpsc;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Stop after this many cycles (runs until Ctrl-C if omitted)
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Register seeded demo strategies against a synthetic market
    #[arg(long)]
    pub demo: bool,
}

/// Seeded noise producer used by `run --demo`; real strategies plug in
/// through the same `SignalSource` boundary
struct DemoStrategy {
    id: String,
    asset: String,
    rng: StdRng,
}

impl SignalSource for DemoStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    fn poll(&mut self, _market: &MarketSnapshot) -> Vec<StrategySignal> {
        let direction = if self.rng.gen_bool(0.5) {
            Direction::Long
        } else {
            Direction::Short
        };
        let confidence: f64 = self.rng.gen_range(0.5..0.9);
        vec![StrategySignal::new(
            self.id.clone(),
            self.asset.clone(),
            direction,
            confidence,
            0.10,
        )]
    }
}

impl RunArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let store = FileSnapshotStore::new(&config.state.snapshot_dir)?;

        let mut pool = StrategyPool::new();
        if self.demo {
            for (i, id) in ["demo-momentum", "demo-reversion", "demo-carry"]
                .iter()
                .enumerate()
            {
                pool.register(Box::new(DemoStrategy {
                    id: id.to_string(),
                    asset: "BTC".to_string(),
                    rng: StdRng::seed_from_u64(config.execution.seed + i as u64),
                }));
            }
        } else {
            tracing::warn!("No strategies registered; engine will cycle without trading");
        }

        let mut market = RandomWalkMarket::new(config.execution.seed, 0.01)
            .with_asset("BTC", dec!(50000), dec!(0.001), dec!(250000))
            .with_asset("ETH", dec!(3000), dec!(0.0015), dec!(120000));

        let mut engine = Engine::new(config, pool, Box::new(store)).await?;

        match self.cycles {
            Some(n) => {
                for _ in 0..n {
                    let snapshot = market.snapshot();
                    let record = engine.run_cycle(&snapshot).await?;
                    tracing::info!(
                        cycle = record.cycle,
                        events = record.events.len(),
                        "Cycle complete"
                    );
                }
            }
            None => {
                let (tx, mut rx) = mpsc::channel(4);
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        let _ = tx.send(EngineCommand::Stop).await;
                    }
                });
                engine.run(&mut market, &mut rx).await?;
            }
        }

        tracing::info!(cycles = engine.cycle(), "Run finished");
        Ok(())
    }
}
