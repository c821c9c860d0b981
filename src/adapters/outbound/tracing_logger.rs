use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Forwards domain messages to `tracing` under the `contact_tracker::domain` target.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: "contact_tracker::domain", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "contact_tracker::domain", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "contact_tracker::domain", "{}", msg);
    }
}

pub fn init_tracing_logger() -> DynLogger {
    Arc::new(TracingBridge)
}

/// Installs the process-wide `fmt` subscriber. `RUST_LOG` takes precedence over `level`.
///
/// If a `log` backend (such as `fast_log`) is already installed, the subscriber is
/// still set but `log` records are not bridged into it; that error is ignored.
pub fn init_tracing_subscriber(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
