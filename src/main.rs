use clap::Parser;
use ensemble_engine::cli::{Cli, Commands};
use ensemble_engine::config::Config;
use ensemble_engine::state::{FileSnapshotStore, SnapshotStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    ensemble_engine::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting decision loop");
            args.execute(config).await?;
        }
        Commands::Status => {
            let store = FileSnapshotStore::new(&config.state.snapshot_dir)?;
            match store.latest().await? {
                Some(snapshot) => {
                    println!("Latest snapshot:");
                    println!("  Cycle:     {}", snapshot.cycle);
                    println!("  Timestamp: {}", snapshot.timestamp);
                    println!("  Cash:      {}", snapshot.cash);
                    println!("  Equity:    {}", snapshot.equity);
                    println!("  Positions: {}", snapshot.positions.len());
                    for (asset, units) in &snapshot.positions {
                        println!("    {asset}: {units}");
                    }
                }
                None => println!("No snapshot found in {:?}", config.state.snapshot_dir),
            }
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Engine: {}s cycle, initial cash {}",
                config.engine.cycle_interval_secs, config.engine.initial_cash
            );
            println!(
                "  Voter: threshold {}",
                config.voter.confidence_threshold
            );
            println!(
                "  Sizing: Kelly={}, clamp [{}, {}]",
                config.sizing.kelly_fraction,
                config.sizing.min_position_pct,
                config.sizing.max_position_pct
            );
            println!(
                "  Breaker: -{}/-{}/-{} (recover below {})",
                config.breaker.caution_pct,
                config.breaker.reduce_pct,
                config.breaker.halt_pct,
                config.breaker.recovery_pct
            );
            println!("  State: {:?}", config.state.snapshot_dir);
        }
    }

    Ok(())
}
