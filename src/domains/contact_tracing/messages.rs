// Wire messages exchanged with the transport layer (JSON, camelCase).
use super::types::{AgentId, Board, Position, QueryResult};
use crate::common::{to_epoch_seconds, DomainError, DomainResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub agent_id: AgentId,
    pub position: Position,
    /// Publisher's clock, seconds since the Unix epoch.
    pub timestamp: f64,
}

impl PositionUpdate {
    pub fn new(agent_id: AgentId, position: Position, timestamp: f64) -> Self {
        Self {
            agent_id,
            position,
            timestamp,
        }
    }

    /// Parses and validates a payload; anything off the board or missing fields is rejected.
    pub fn decode(payload: &[u8], board: &Board) -> DomainResult<Self> {
        let update: Self = parse(payload)?;
        require_agent(&update.agent_id)?;
        if !update.timestamp.is_finite() {
            return Err(DomainError::MalformedEvent {
                reason: "timestamp is not a finite number".to_string(),
            });
        }
        board.check(update.position)?;
        Ok(update)
    }

    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub agent_id: AgentId,
    pub correlation_id: Uuid,
    /// Address the reply is routed to (the Kafka message key for replies).
    pub reply_to: String,
}

impl QueryRequest {
    pub fn new(agent_id: AgentId, reply_to: impl Into<String>) -> Self {
        Self {
            agent_id,
            correlation_id: Uuid::new_v4(),
            reply_to: reply_to.into(),
        }
    }

    pub fn decode(payload: &[u8]) -> DomainResult<Self> {
        let request: Self = parse(payload)?;
        require_agent(&request.agent_id)?;
        Ok(request)
    }

    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub peer: AgentId,
    pub position: Position,
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReply {
    pub agent_id: AgentId,
    pub correlation_id: Uuid,
    pub contacts: Vec<ContactRecord>,
    pub timestamp: f64,
}

impl QueryReply {
    pub fn from_result(result: QueryResult, correlation_id: Uuid) -> Self {
        Self {
            agent_id: result.agent,
            correlation_id,
            contacts: result
                .contacts
                .into_iter()
                .map(|c| ContactRecord {
                    peer: c.peer,
                    position: c.position,
                    time: to_epoch_seconds(c.timestamp),
                })
                .collect(),
            timestamp: to_epoch_seconds(result.timestamp),
        }
    }

    pub fn decode(payload: &[u8]) -> DomainResult<Self> {
        parse(payload)
    }

    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

fn parse<T: DeserializeOwned>(payload: &[u8]) -> DomainResult<T> {
    serde_json::from_slice(payload).map_err(|e| DomainError::MalformedEvent {
        reason: e.to_string(),
    })
}

fn require_agent(agent: &AgentId) -> DomainResult<()> {
    if agent.as_str().trim().is_empty() {
        return Err(DomainError::MalformedEvent {
            reason: "agentId is empty".to_string(),
        });
    }
    Ok(())
}
