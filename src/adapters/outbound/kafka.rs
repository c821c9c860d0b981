use crate::common::{DomainResult, TransportError, TransportResult};
use crate::config::KafkaConfig;
use crate::domains::contact_tracing::{PositionSink, PositionUpdate, QueryReply, QueryRequest, QueryTransport};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::Message;
use std::time::{Duration, Instant};
use uuid::Uuid;

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

pub fn create_producer(config: &KafkaConfig) -> TransportResult<FutureProducer> {
    ClientConfig::new()
        .set("bootstrap.servers", config.brokers.join(","))
        .set("client.id", &config.client_id)
        .set("message.timeout.ms", "5000")
        .create()
        .map_err(|e| TransportError::Kafka(format!("Failed to create Kafka producer: {}", e)))
}

/// `offset_reset` is `latest` for live feeds and replies.
pub fn create_consumer(
    config: &KafkaConfig,
    group_id: &str,
    topic: &str,
    offset_reset: &str,
) -> TransportResult<StreamConsumer> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", config.brokers.join(","))
        .set("group.id", group_id)
        .set("client.id", &config.client_id)
        .set("enable.partition.eof", "false")
        .set("session.timeout.ms", "6000")
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", offset_reset)
        .create()
        .map_err(|e| TransportError::Kafka(format!("Failed to create Kafka consumer: {}", e)))?;

    consumer
        .subscribe(&[topic])
        .map_err(|e| TransportError::Kafka(format!("Failed to subscribe to {}: {}", topic, e)))?;
    Ok(consumer)
}

pub(crate) async fn produce(
    producer: &FutureProducer,
    topic: &str,
    key: &str,
    payload: &[u8],
) -> TransportResult<()> {
    let record = FutureRecord::to(topic).key(key).payload(payload);
    producer
        .send(record, SEND_TIMEOUT)
        .await
        .map(|_| ())
        .map_err(|(e, _)| TransportError::Kafka(format!("Failed to send to {}: {}", topic, e)))
}

/// Publishes position reports on the positions topic, keyed by agent id so that one
/// agent's reports stay on one partition and keep their order.
pub struct KafkaPositionSink {
    producer: FutureProducer,
    topic: String,
}

impl KafkaPositionSink {
    pub fn new(config: &KafkaConfig) -> TransportResult<Self> {
        Ok(Self {
            producer: create_producer(config)?,
            topic: config.topics.positions.clone(),
        })
    }
}

#[async_trait]
impl PositionSink for KafkaPositionSink {
    async fn publish(&self, update: &PositionUpdate) -> TransportResult<()> {
        let payload = update.encode()?;
        produce(&self.producer, &self.topic, update.agent_id.as_str(), &payload).await
    }
}

/// Requester side of the query exchange. Replies are read from the shared reply
/// topic with a private consumer group and filtered by message key.
pub struct KafkaQueryTransport {
    producer: FutureProducer,
    replies: StreamConsumer,
    query_topic: String,
    reply_address: String,
}

impl KafkaQueryTransport {
    pub async fn connect(config: &KafkaConfig) -> TransportResult<Self> {
        let reply_address = format!("client-{}", Uuid::new_v4());
        let replies = create_consumer(config, &reply_address, &config.topics.query_replies, "latest")?;
        wait_for_assignment(&replies, Duration::from_secs(3)).await;

        Ok(Self {
            producer: create_producer(config)?,
            replies,
            query_topic: config.topics.queries.clone(),
            reply_address,
        })
    }
}

#[async_trait]
impl QueryTransport for KafkaQueryTransport {
    fn reply_address(&self) -> &str {
        &self.reply_address
    }

    async fn send_query(&self, request: &QueryRequest) -> TransportResult<()> {
        let payload = request.encode()?;
        produce(&self.producer, &self.query_topic, request.agent_id.as_str(), &payload).await
    }

    async fn next_reply(&mut self) -> Option<DomainResult<QueryReply>> {
        loop {
            let message = match self.replies.recv().await {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!("Kafka reply consumer error: {}", e);
                    continue;
                }
            };
            if message.key() != Some(self.reply_address.as_bytes()) {
                continue;
            }
            let payload = message.payload().unwrap_or_default();
            return Some(QueryReply::decode(payload));
        }
    }
}

/// Replies produced right after a query would be missed if the consumer had no
/// partitions yet, so wait briefly for the assignment to settle.
async fn wait_for_assignment(consumer: &StreamConsumer, limit: Duration) {
    let deadline = Instant::now() + limit;
    loop {
        match consumer.assignment() {
            Ok(tpl) if tpl.count() > 0 => {
                tracing::debug!("Reply consumer partition assignment complete");
                return;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to query consumer assignment: {}", e),
        }

        if Instant::now() > deadline {
            tracing::warn!("Timed out waiting for reply consumer partition assignment; proceeding anyway");
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
