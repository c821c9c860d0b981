use anyhow::Context;
use clap::Parser;
use contact_tracker::adapters::outbound::{init_tracing_subscriber, KafkaPositionSink};
use contact_tracker::common::SystemClock;
use contact_tracker::domains::{AgentId, AgentSimulator, Board};
use contact_tracker::Config;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Publishes random-walk agents to the positions topic", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Number of agents (defaults to simulator.agent_count)
    #[arg(short, long)]
    agents: Option<usize>,

    /// Seed for reproducible walks
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(Some(&args.config)).context("Failed to load configuration")?;
    config.validate()?;
    init_tracing_subscriber(&config.logging.level);

    let board = Board::new(config.tracker.board_size);
    let sink = Arc::new(KafkaPositionSink::new(&config.kafka)?);
    let clock = Arc::new(SystemClock);
    let count = args.agents.unwrap_or(config.simulator.agent_count);
    let mut seeds = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut handles = Vec::with_capacity(count);
    for i in 1..=count {
        let agent = AgentId::new(format!("{}{}", config.simulator.agent_prefix, i));
        let speed = seeds.gen_range(config.simulator.min_speed..=config.simulator.max_speed);
        let simulator = AgentSimulator::new(agent, speed, board, StdRng::seed_from_u64(seeds.gen()));
        let sink = sink.clone();
        let clock = clock.clone();
        let shutdown = shutdown_rx.clone();
        handles.push(tokio::spawn(async move {
            simulator.run(sink.as_ref(), clock.as_ref(), shutdown).await
        }));
    }

    info!("Simulating {} agents on a {}x{} board", count, board.size(), board.size());
    tokio::signal::ctrl_c().await?;
    info!("Stopping simulators");
    let _ = shutdown_tx.send(true);

    for handle in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Simulator failed: {}", e),
            Err(e) => error!("Simulator task panicked: {}", e),
        }
    }
    Ok(())
}
