use crate::domains::logger::DomainLogger;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

enum Level {
    Info,
    Warn,
    Error,
}

struct LogMessage {
    level: Level,
    msg: String,
}

/// Non-blocking logger: messages are queued on a bounded channel and forwarded to
/// the wrapped logger by a background task. When the queue is full the message is
/// dropped and counted.
pub struct BufferedLogger {
    sender: mpsc::Sender<LogMessage>,
    dropped: AtomicU64,
}

impl BufferedLogger {
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn enqueue(&self, level: Level, msg: &str) {
        let message = LogMessage {
            level,
            msg: msg.to_string(),
        };
        if self.sender.try_send(message).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl DomainLogger for BufferedLogger {
    fn info(&self, msg: &str) {
        self.enqueue(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.enqueue(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.enqueue(Level::Error, msg);
    }
}

/// Must be called inside a tokio runtime.
pub fn init_buffered_logger(target: Arc<dyn DomainLogger>, capacity: usize) -> Arc<BufferedLogger> {
    let (sender, mut receiver) = mpsc::channel::<LogMessage>(capacity.max(1));

    tokio::spawn(async move {
        while let Some(message) = receiver.recv().await {
            match message.level {
                Level::Info => target.info(&message.msg),
                Level::Warn => target.warn(&message.msg),
                Level::Error => target.error(&message.msg),
            }
        }
    });

    Arc::new(BufferedLogger {
        sender,
        dropped: AtomicU64::new(0),
    })
}
