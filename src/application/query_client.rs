use crate::common::{TransportError, TransportResult};
use crate::domains::contact_tracing::{AgentId, QueryReply, QueryRequest, QueryTransport};
use crate::domains::DynLogger;
use std::time::Duration;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Request/reply client for contact-history queries.
///
/// Each query carries a fresh correlation id; replies with any other id are
/// skipped. One query is in flight at a time.
pub struct QueryClient<T: QueryTransport> {
    transport: T,
    timeout: Duration,
    logger: DynLogger,
}

impl<T: QueryTransport> QueryClient<T> {
    pub fn new(transport: T, logger: DynLogger) -> Self {
        Self {
            transport,
            timeout: DEFAULT_QUERY_TIMEOUT,
            logger,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn query_contacts(&mut self, agent: &AgentId) -> TransportResult<QueryReply> {
        let request = QueryRequest::new(agent.clone(), self.transport.reply_address());
        self.logger.info(&format!(
            "Sending query for {} (corr_id: {})",
            agent, request.correlation_id
        ));
        self.transport.send_query(&request).await?;

        let transport = &mut self.transport;
        let logger = &self.logger;
        let wait = async {
            loop {
                match transport.next_reply().await {
                    None => return Err(TransportError::Closed),
                    Some(Ok(reply)) if reply.correlation_id == request.correlation_id => {
                        return Ok(reply)
                    }
                    Some(Ok(other)) => {
                        tracing::debug!("Ignoring reply for correlation id {}", other.correlation_id)
                    }
                    Some(Err(e)) => logger.warn(&format!("Discarding undecodable reply: {}", e)),
                }
            }
        };

        match tokio::time::timeout(self.timeout, wait).await {
            Ok(Ok(reply)) => {
                self.logger.info(&format!(
                    "Got response for {} with {} contacts",
                    agent,
                    reply.contacts.len()
                ));
                Ok(reply)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                self.logger.warn(&format!("No response received for {}", agent));
                Err(TransportError::Timeout)
            }
        }
    }
}
