use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Writes domain messages to stdout/stderr, tagged with the emitting component.
struct ConsoleLogger {
    component: String,
}

impl DomainLogger for ConsoleLogger {
    fn info(&self, msg: &str) {
        println!("[{}] {}", self.component, msg);
    }

    fn warn(&self, msg: &str) {
        println!("[{}] WARN: {}", self.component, msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("[{}] ERROR: {}", self.component, msg);
    }
}

/// Console-backed logger, used when no file sink is available.
pub fn init_console_logger(component: &str) -> DynLogger {
    Arc::new(ConsoleLogger {
        component: component.to_string(),
    })
}
