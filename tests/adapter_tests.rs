use chrono::{TimeZone, Utc};
use contact_tracker::adapters::inbound::{position_channel, ChannelPositionSink};
use contact_tracker::common::{ApplicationError, DomainError, SteppingClock};
use contact_tracker::domains::contact_tracing::*;
use contact_tracker::Config;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::watch;

const SAMPLE: &str = r#"
[tracker]
board_size = 12
max_history = 25

[kafka]
brokers = ["broker-a:9092", "broker-b:9092"]
group_id = "tracker-test"

[simulator]
agent_count = 3
min_speed = 1.0
max_speed = 1.5

[logging]
level = "debug"
"#;

#[tokio::test]
async fn test_config_from_file_fills_missing_sections_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracker.toml");
    fs::write(&path, SAMPLE).unwrap();

    let config = Config::from_file(&path).await.unwrap();

    assert_eq!(config.tracker.board_size, 12);
    assert_eq!(config.tracker.max_history, 25);
    assert_eq!(config.kafka.brokers.len(), 2);
    assert_eq!(config.kafka.group_id, "tracker-test");
    assert_eq!(config.kafka.topics.positions, "agent-positions");
    assert_eq!(config.simulator.agent_prefix, "person");
    assert_eq!(config.logging.level, "debug");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_load_layers_environment_over_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracker.toml");
    fs::write(&path, SAMPLE).unwrap();

    let from_file = Config::load(Some(&path)).unwrap();
    assert_eq!(from_file.tracker.max_history, 25);

    std::env::set_var("CONTACT_TRACKER__TRACKER__MAX_HISTORY", "7");
    let layered = Config::load(Some(&path));
    std::env::remove_var("CONTACT_TRACKER__TRACKER__MAX_HISTORY");
    let layered = layered.unwrap();

    assert_eq!(layered.tracker.max_history, 7);
    assert_eq!(layered.tracker.board_size, 12);

    let missing = Config::load(Some(dir.path().join("absent.toml"))).unwrap();
    assert_eq!(missing.tracker.board_size, 10);
}

#[test]
fn test_config_validation_is_a_startup_failure() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.tracker.max_history = 0;
    assert!(matches!(config.validate(), Err(ApplicationError::Configuration(_))));

    let mut config = Config::default();
    config.simulator.min_speed = 3.0;
    config.simulator.max_speed = 1.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.tracker.board_size = 0;
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn test_channel_source_validates_against_board() {
    let (sink, mut source) = position_channel(4, Board::new(5));
    sink.send_raw(br#"{"agentId":"a","position":[4,4],"timestamp":2.5}"#.to_vec())
        .await
        .unwrap();
    sink.send_raw(br#"{"agentId":"a","position":[5,4],"timestamp":2.5}"#.to_vec())
        .await
        .unwrap();
    drop(sink);

    let first = source.next_update().await.unwrap().unwrap();
    assert_eq!(first.position, Position::new(4, 4));
    assert!(matches!(
        source.next_update().await,
        Some(Err(DomainError::OutOfBounds { .. }))
    ));
    assert!(source.next_update().await.is_none());
}

#[test]
fn test_simulator_walk_stays_on_board_and_moves_one_cell() {
    let board = Board::new(4);
    let mut sim = AgentSimulator::new("walker".into(), 2.0, board, StdRng::seed_from_u64(7));
    assert!(board.contains(sim.position()));
    assert_eq!(sim.tick_interval(), Duration::from_millis(500));

    for _ in 0..500 {
        let before = sim.position();
        let after = sim.step();
        assert!(board.contains(after));
        assert!(before.x.abs_diff(after.x) <= 1);
        assert!(before.y.abs_diff(after.y) <= 1);
    }
}

#[test]
fn test_simulator_is_reproducible_for_a_seed() {
    let board = Board::new(10);
    let mut a = AgentSimulator::new("a".into(), 1.0, board, StdRng::seed_from_u64(42));
    let mut b = AgentSimulator::new("a".into(), 1.0, board, StdRng::seed_from_u64(42));
    for _ in 0..20 {
        assert_eq!(a.step(), b.step());
    }
}

#[tokio::test(start_paused = true)]
async fn test_simulator_publishes_start_and_each_tick_until_shutdown() {
    let board = Board::new(10);
    let (sink, mut source): (ChannelPositionSink, _) = position_channel(64, board);
    let clock = SteppingClock::starting_at(Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    let sim = AgentSimulator::new("p1".into(), 4.0, board, StdRng::seed_from_u64(1));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let run = tokio::spawn(async move { sim.run(&sink, &clock, shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(1100)).await;
    shutdown_tx.send(true).unwrap();
    run.await.unwrap().unwrap();

    let mut published = Vec::new();
    while let Some(update) = source.next_update().await {
        published.push(update.unwrap());
    }
    // Start report plus four ticks at 4 moves per second.
    assert_eq!(published.len(), 5);
    assert!(published.iter().all(|u| u.agent_id.as_str() == "p1"));
    assert!(published.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}
