use crate::common::{ApplicationError, ApplicationResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `CONTACT_TRACKER__TRACKER__MAX_HISTORY=50`.
pub const ENV_PREFIX: &str = "CONTACT_TRACKER";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub kafka: KafkaConfig,
    pub simulator: SimulatorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Cells per axis; positions must lie in `[0, board_size)`.
    pub board_size: u32,
    /// Contacts retained per agent before oldest-first eviction.
    pub max_history: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    pub client_id: String,
    pub group_id: String,
    pub topics: KafkaTopics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaTopics {
    pub positions: String,
    pub queries: String,
    pub query_replies: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub agent_count: usize,
    pub agent_prefix: String,
    /// Moves per second, drawn uniformly per agent.
    pub min_speed: f64,
    pub max_speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Optional domain log file written through `fast_log`.
    pub file: Option<String>,
}

impl Config {
    /// Reads a TOML file. Missing sections fall back to their defaults.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Layers an optional TOML file under `CONTACT_TRACKER__*` environment variables.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path.as_ref()).required(false));
        }
        let config = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("kafka.brokers")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Startup-time checks; a config that fails here never reaches the tracker.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.tracker.board_size == 0 {
            return Err(ApplicationError::Configuration(
                "tracker.board_size must be positive".to_string(),
            ));
        }
        if self.tracker.max_history == 0 {
            return Err(ApplicationError::Configuration(
                "tracker.max_history must be positive".to_string(),
            ));
        }
        if self.kafka.brokers.is_empty() {
            return Err(ApplicationError::Configuration(
                "kafka.brokers must list at least one broker".to_string(),
            ));
        }
        let sim = &self.simulator;
        if !(sim.min_speed > 0.0 && sim.min_speed <= sim.max_speed && sim.max_speed.is_finite()) {
            return Err(ApplicationError::Configuration(format!(
                "simulator speed range {}..={} is invalid",
                sim.min_speed, sim.max_speed
            )));
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            board_size: 10,
            max_history: 100,
        }
    }
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            client_id: "contact-tracker".to_string(),
            group_id: "contact-tracker-group".to_string(),
            topics: KafkaTopics::default(),
        }
    }
}

impl Default for KafkaTopics {
    fn default() -> Self {
        Self {
            positions: "agent-positions".to_string(),
            queries: "contact-queries".to_string(),
            query_replies: "contact-query-replies".to_string(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            agent_count: 10,
            agent_prefix: "person".to_string(),
            min_speed: 0.5,
            max_speed: 2.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
