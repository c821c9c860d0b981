use crate::common::{DomainResult, TransportError, TransportResult};
use crate::domains::contact_tracing::{
    Board, PositionSink, PositionSource, PositionUpdate, QueryChannel, QueryReply, QueryRequest,
    QueryTransport,
};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// In-process transport for tests and single-binary demos.
///
/// Messages travel as JSON bytes, so decoding and validation follow the same
/// path as the Kafka adapters and malformed payloads can be injected with
/// `send_raw`.
pub fn position_channel(capacity: usize, board: Board) -> (ChannelPositionSink, ChannelPositionSource) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        ChannelPositionSink { sender },
        ChannelPositionSource { receiver, board },
    )
}

pub fn query_channel(capacity: usize) -> (InMemoryQueryTransport, InMemoryQueryChannel) {
    let (request_tx, request_rx) = mpsc::channel(capacity);
    let (reply_tx, reply_rx) = mpsc::channel(capacity);
    (
        InMemoryQueryTransport {
            requests: request_tx,
            replies: reply_rx,
        },
        InMemoryQueryChannel {
            requests: request_rx,
            replies: reply_tx,
        },
    )
}

#[derive(Clone)]
pub struct ChannelPositionSink {
    sender: mpsc::Sender<Vec<u8>>,
}

impl ChannelPositionSink {
    pub async fn send_raw(&self, payload: Vec<u8>) -> TransportResult<()> {
        self.sender
            .send(payload)
            .await
            .map_err(|_| TransportError::Closed)
    }
}

#[async_trait]
impl PositionSink for ChannelPositionSink {
    async fn publish(&self, update: &PositionUpdate) -> TransportResult<()> {
        self.send_raw(update.encode()?).await
    }
}

pub struct ChannelPositionSource {
    receiver: mpsc::Receiver<Vec<u8>>,
    board: Board,
}

#[async_trait]
impl PositionSource for ChannelPositionSource {
    async fn next_update(&mut self) -> Option<DomainResult<PositionUpdate>> {
        let payload = self.receiver.recv().await?;
        Some(PositionUpdate::decode(&payload, &self.board))
    }
}

pub struct InMemoryQueryTransport {
    requests: mpsc::Sender<Vec<u8>>,
    replies: mpsc::Receiver<Vec<u8>>,
}

impl InMemoryQueryTransport {
    pub const REPLY_ADDRESS: &'static str = "in-memory";

    pub async fn send_raw(&self, payload: Vec<u8>) -> TransportResult<()> {
        self.requests
            .send(payload)
            .await
            .map_err(|_| TransportError::Closed)
    }
}

#[async_trait]
impl QueryTransport for InMemoryQueryTransport {
    fn reply_address(&self) -> &str {
        Self::REPLY_ADDRESS
    }

    async fn send_query(&self, request: &QueryRequest) -> TransportResult<()> {
        self.send_raw(request.encode()?).await
    }

    async fn next_reply(&mut self) -> Option<DomainResult<QueryReply>> {
        let payload = self.replies.recv().await?;
        Some(QueryReply::decode(&payload))
    }
}

pub struct InMemoryQueryChannel {
    requests: mpsc::Receiver<Vec<u8>>,
    replies: mpsc::Sender<Vec<u8>>,
}

impl InMemoryQueryChannel {
    /// Pushes an arbitrary payload onto the reply route, bypassing the tracker.
    pub async fn send_raw_reply(&self, payload: Vec<u8>) -> TransportResult<()> {
        self.replies
            .send(payload)
            .await
            .map_err(|_| TransportError::Closed)
    }
}

#[async_trait]
impl QueryChannel for InMemoryQueryChannel {
    async fn next_query(&mut self) -> Option<DomainResult<QueryRequest>> {
        let payload = self.requests.recv().await?;
        Some(QueryRequest::decode(&payload))
    }

    async fn reply(&self, _request: &QueryRequest, reply: QueryReply) -> TransportResult<()> {
        self.send_raw_reply(reply.encode()?).await
    }
}
