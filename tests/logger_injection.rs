use contact_tracker::adapters::inbound::position_channel;
use contact_tracker::adapters::outbound::{init_buffered_logger, init_noop_logger, MultiLogger};
use contact_tracker::application::TrackerService;
use contact_tracker::domains::contact_tracing::{Board, Position, PositionSink, PositionUpdate, Tracker};
use contact_tracker::domains::logger::{DomainLogger, DynLogger};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

#[tokio::test]
async fn test_buffered_logger_forwards_in_background() {
    let capture = Arc::new(BridgeCapture::new());
    let buffered = init_buffered_logger(capture.clone(), 8);

    buffered.info("one");
    buffered.warn("two");
    buffered.error("three");

    tokio::time::sleep(Duration::from_millis(50)).await;

    let msgs = capture.messages.lock().unwrap();
    assert_eq!(msgs.as_slice(), ["INFO:one", "WARN:two", "ERR:three"]);
    assert_eq!(buffered.dropped(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn test_buffered_logger_counts_overflow() {
    let capture = Arc::new(BridgeCapture::new());
    let buffered = init_buffered_logger(capture.clone(), 2);

    // The drain task cannot run until this task yields, so the queue fills up.
    for i in 0..5 {
        buffered.info(&format!("msg {}", i));
    }
    assert_eq!(buffered.dropped(), 3);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(capture.messages.lock().unwrap().len(), 2);
}

#[test]
fn test_multi_logger_fans_out_to_every_target() {
    let first = Arc::new(BridgeCapture::new());
    let second = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::new(vec![first.clone() as DynLogger, second.clone() as DynLogger, init_noop_logger()]);

    multi.warn("shared");

    assert_eq!(first.messages.lock().unwrap().as_slice(), ["WARN:shared"]);
    assert_eq!(second.messages.lock().unwrap().as_slice(), ["WARN:shared"]);
}

#[tokio::test]
async fn test_service_reports_dropped_events_to_injected_logger() {
    let capture = Arc::new(BridgeCapture::new());
    let logger: DynLogger = capture.clone();
    let tracker = Tracker::new(Board::new(3), NonZeroUsize::new(4).unwrap(), logger.clone());
    let service = TrackerService::new(tracker, logger);
    let (sink, source) = position_channel(8, Board::new(3));
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    sink.publish(&PositionUpdate::new("a".into(), Position::new(0, 0), 1.0)).await.unwrap();
    sink.publish(&PositionUpdate::new("b".into(), Position::new(0, 0), 1.0)).await.unwrap();
    sink.send_raw(b"[]".to_vec()).await.unwrap();
    drop(sink);
    service.run_positions(source, shutdown_rx).await;

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m == "INFO:CONTACT DETECTED: b and a at 0,0"));
    assert!(msgs.iter().any(|m| m.starts_with("WARN:Dropping position update")));
}
