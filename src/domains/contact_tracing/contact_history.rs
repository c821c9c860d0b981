use super::types::{AgentId, ContactEvent};
use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;

/// Bounded per-agent contact log, oldest first.
///
/// Each agent's sequence holds at most `max_history` events; appending past the
/// bound evicts from the head. Histories are independent: recording a contact
/// for one agent never evicts from another agent's log.
#[derive(Debug, Clone)]
pub struct ContactHistory {
    max_history: NonZeroUsize,
    histories: HashMap<AgentId, VecDeque<ContactEvent>>,
}

impl ContactHistory {
    pub fn new(max_history: NonZeroUsize) -> Self {
        Self {
            max_history,
            histories: HashMap::new(),
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history.get()
    }

    pub fn append(&mut self, agent: &AgentId, event: ContactEvent) {
        let bound = self.max_history.get();
        let history = self
            .histories
            .entry(agent.clone())
            .or_insert_with(|| VecDeque::with_capacity(bound.min(16)));

        history.push_back(event);
        if history.len() > bound {
            history.pop_front();
        }
    }

    /// Copy of the agent's history, oldest to newest. Unknown agents yield an empty list.
    pub fn snapshot(&self, agent: &AgentId) -> Vec<ContactEvent> {
        self.histories
            .get(agent)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len_for(&self, agent: &AgentId) -> usize {
        self.histories.get(agent).map_or(0, VecDeque::len)
    }
}
