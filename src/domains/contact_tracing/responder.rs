use super::contact_history::ContactHistory;
use super::types::{AgentId, QueryResult};
use chrono::{DateTime, Utc};

pub struct QueryResponder;

impl QueryResponder {
    /// Never fails: an agent without contacts is answered with an empty list.
    pub fn respond(history: &ContactHistory, agent: &AgentId, now: DateTime<Utc>) -> QueryResult {
        QueryResult {
            agent: agent.clone(),
            contacts: history.snapshot(agent),
            timestamp: now,
        }
    }
}
