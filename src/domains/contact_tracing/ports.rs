use super::messages::{PositionUpdate, QueryReply, QueryRequest};
use crate::common::{DomainResult, TransportResult};
use async_trait::async_trait;

/// Port delivering position reports to the tracker.
/// `None` means the source is exhausted; `Some(Err(_))` is a single rejected event.
#[async_trait]
pub trait PositionSource: Send {
    async fn next_update(&mut self) -> Option<DomainResult<PositionUpdate>>;
}

/// Port delivering contact queries and carrying correlated replies back.
#[async_trait]
pub trait QueryChannel: Send {
    async fn next_query(&mut self) -> Option<DomainResult<QueryRequest>>;
    async fn reply(&self, request: &QueryRequest, reply: QueryReply) -> TransportResult<()>;
}

/// Port used by position publishers (the simulator).
#[async_trait]
pub trait PositionSink: Send + Sync {
    async fn publish(&self, update: &PositionUpdate) -> TransportResult<()>;
}

/// Requester side of the query exchange.
#[async_trait]
pub trait QueryTransport: Send {
    /// Address replies for this transport are routed to.
    fn reply_address(&self) -> &str;
    async fn send_query(&self, request: &QueryRequest) -> TransportResult<()>;
    /// Next reply seen on the reply route, correlated or not. `None` once closed.
    async fn next_reply(&mut self) -> Option<DomainResult<QueryReply>>;
}
