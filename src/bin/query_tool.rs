use anyhow::Context;
use clap::Parser;
use contact_tracker::adapters::outbound::{init_console_logger, init_tracing_subscriber, KafkaQueryTransport};
use contact_tracker::application::QueryClient;
use contact_tracker::domains::AgentId;
use contact_tracker::Config;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Queries the contact history of one agent", long_about = None)]
struct Args {
    /// Agent to query
    agent: String,

    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Seconds to wait for the reply
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(Some(&args.config)).context("Failed to load configuration")?;
    init_tracing_subscriber(&config.logging.level);

    let transport = KafkaQueryTransport::connect(&config.kafka).await?;
    let mut client = QueryClient::new(transport, init_console_logger("query_tool"))
        .with_timeout(Duration::from_secs(args.timeout));

    let reply = client.query_contacts(&AgentId::new(args.agent)).await?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
