use crate::domains::logger::{DynLogger, FileLogger};
use std::sync::Arc;

/// Installs `fast_log` for `path` and returns a domain logger writing through it.
pub fn init_file_logger(path: &str, level: log::LevelFilter) -> Result<DynLogger, String> {
    FileLogger::init(path, level).map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FileLogger))
}
