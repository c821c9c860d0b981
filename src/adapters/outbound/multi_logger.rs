use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Fans every message out to each target in order.
pub struct MultiLogger {
    targets: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(targets: Vec<DynLogger>) -> Self {
        Self { targets }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.error(msg));
    }
}

/// File logger plus `tracing`; falls back to `tracing` alone when `fast_log` cannot
/// be installed (for instance because another `log` backend is already set).
pub fn init_combined_logger(path: &str, level: log::LevelFilter) -> DynLogger {
    let bridge = super::init_tracing_logger();
    match super::init_file_logger(path, level) {
        Ok(file) => Arc::new(MultiLogger::new(vec![file, bridge])),
        Err(e) => {
            bridge.warn(&format!("{}; domain log file {} disabled", e, path));
            bridge
        }
    }
}
