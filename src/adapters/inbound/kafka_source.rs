use crate::adapters::outbound::kafka::{create_consumer, create_producer, produce};
use crate::common::{DomainError, DomainResult, TransportResult};
use crate::config::KafkaConfig;
use crate::domains::contact_tracing::{
    Board, PositionSource, PositionUpdate, QueryChannel, QueryReply, QueryRequest,
};
use async_trait::async_trait;
use rdkafka::consumer::StreamConsumer;
use rdkafka::producer::FutureProducer;
use rdkafka::Message;

/// Position reports consumed from the positions topic.
///
/// Each tracker instance uses its own consumer group so every instance sees every
/// report (fan-out).
pub struct KafkaPositionSource {
    consumer: StreamConsumer,
    board: Board,
}

impl KafkaPositionSource {
    pub fn new(config: &KafkaConfig, board: Board) -> TransportResult<Self> {
        let group = format!("{}-positions", config.group_id);
        let consumer = create_consumer(config, &group, &config.topics.positions, "latest")?;
        Ok(Self { consumer, board })
    }
}

#[async_trait]
impl PositionSource for KafkaPositionSource {
    async fn next_update(&mut self) -> Option<DomainResult<PositionUpdate>> {
        loop {
            match self.consumer.recv().await {
                Ok(message) => {
                    return Some(match message.payload() {
                        Some(payload) => PositionUpdate::decode(payload, &self.board),
                        None => Err(DomainError::MalformedEvent {
                            reason: "empty position payload".to_string(),
                        }),
                    });
                }
                Err(e) => tracing::warn!("Kafka position consumer error: {}", e),
            }
        }
    }
}

/// Queries consumed from the queries topic; replies go to the reply topic keyed by
/// the requester's `replyTo` address.
pub struct KafkaQueryChannel {
    consumer: StreamConsumer,
    producer: FutureProducer,
    reply_topic: String,
}

impl KafkaQueryChannel {
    pub fn new(config: &KafkaConfig) -> TransportResult<Self> {
        let group = format!("{}-queries", config.group_id);
        Ok(Self {
            consumer: create_consumer(config, &group, &config.topics.queries, "latest")?,
            producer: create_producer(config)?,
            reply_topic: config.topics.query_replies.clone(),
        })
    }
}

#[async_trait]
impl QueryChannel for KafkaQueryChannel {
    async fn next_query(&mut self) -> Option<DomainResult<QueryRequest>> {
        loop {
            match self.consumer.recv().await {
                Ok(message) => {
                    let payload = message.payload().unwrap_or_default();
                    return Some(QueryRequest::decode(payload));
                }
                Err(e) => tracing::warn!("Kafka query consumer error: {}", e),
            }
        }
    }

    async fn reply(&self, request: &QueryRequest, reply: QueryReply) -> TransportResult<()> {
        let payload = reply.encode()?;
        produce(&self.producer, &self.reply_topic, &request.reply_to, &payload).await
    }
}
