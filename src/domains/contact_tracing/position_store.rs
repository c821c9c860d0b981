use super::types::{AgentId, Position};
use std::collections::HashMap;

/// Latest reported position per agent. Entries are never removed.
#[derive(Debug, Default, Clone)]
pub struct PositionStore {
    positions: HashMap<AgentId, Position>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the stored position and returns the previous one, if any.
    pub fn set_position(&mut self, agent: AgentId, position: Position) -> Option<Position> {
        self.positions.insert(agent, position)
    }

    pub fn position_of(&self, agent: &AgentId) -> Option<Position> {
        self.positions.get(agent).copied()
    }

    /// Snapshot of every known position. Order is unspecified.
    pub fn all_positions(&self) -> Vec<(AgentId, Position)> {
        self.positions
            .iter()
            .map(|(agent, position)| (agent.clone(), *position))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
