use anyhow::Context;
use clap::Parser;
use contact_tracker::adapters::inbound::{KafkaPositionSource, KafkaQueryChannel};
use contact_tracker::adapters::outbound::{
    init_buffered_logger, init_combined_logger, init_tracing_logger, init_tracing_subscriber,
};
use contact_tracker::application::TrackerService;
use contact_tracker::domains::{level_filter, DynLogger, Tracker};
use contact_tracker::Config;
use tokio::sync::watch;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Contact tracker service", long_about = None)]
struct Args {
    /// Config file path (optional; CONTACT_TRACKER__* variables override it)
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(Some(&args.config)).context("Failed to load configuration")?;
    config.validate()?;

    // fast_log must claim the `log` facade before the tracing subscriber does.
    let base: DynLogger = match &config.logging.file {
        Some(path) => init_combined_logger(path, level_filter(&config.logging.level)),
        None => init_tracing_logger(),
    };
    init_tracing_subscriber(&config.logging.level);
    let logger: DynLogger = init_buffered_logger(base, 1024);

    info!("Starting contact tracker");
    info!("Kafka brokers: {:?}", config.kafka.brokers);
    info!(
        "Board {}x{}, max history {}",
        config.tracker.board_size, config.tracker.board_size, config.tracker.max_history
    );

    let tracker = Tracker::from_config(&config.tracker, logger.clone())?;
    let service = TrackerService::new(tracker, logger);

    let positions = KafkaPositionSource::new(&config.kafka, service.tracker().board())?;
    let queries = KafkaQueryChannel::new(&config.kafka)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ingest_task = service.spawn_positions(positions, shutdown_rx.clone());
    let query_task = service.spawn_queries(queries, shutdown_rx);

    info!("Tracker started. Listening for position updates and queries...");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down tracker...");
    let _ = shutdown_tx.send(true);

    let (ingest, queries) = tokio::try_join!(ingest_task, query_task)?;
    info!(
        "Ingested {} updates ({} rejected, {} contacts); answered {} queries ({} rejected)",
        ingest.accepted, ingest.rejected, ingest.contacts, queries.answered, queries.rejected
    );
    Ok(())
}
