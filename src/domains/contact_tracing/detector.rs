use super::contact_history::ContactHistory;
use super::position_store::PositionStore;
use super::types::{AgentId, ContactEvent, Position};
use crate::common::Clock;

/// Outcome of a single position update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// False when the agent re-reported the cell it was already on.
    pub moved: bool,
    pub peers: Vec<AgentId>,
}

impl Detection {
    fn unmoved() -> Self {
        Self {
            moved: false,
            peers: Vec::new(),
        }
    }
}

/// Turns position updates into mutual contact records.
pub struct ContactDetector;

impl ContactDetector {
    /// Stores `new_position` for `agent` and, if the agent actually moved (a first
    /// report always counts), records a contact in both directions with every other
    /// agent currently on the same cell. Each direction is stamped by its own clock
    /// reading.
    pub fn on_position_update(
        positions: &mut PositionStore,
        history: &mut ContactHistory,
        agent: &AgentId,
        new_position: Position,
        clock: &dyn Clock,
    ) -> Detection {
        let previous = positions.set_position(agent.clone(), new_position);
        if previous == Some(new_position) {
            return Detection::unmoved();
        }

        let peers: Vec<AgentId> = positions
            .all_positions()
            .into_iter()
            .filter(|(other, position)| other != agent && *position == new_position)
            .map(|(other, _)| other)
            .collect();

        for peer in &peers {
            history.append(agent, ContactEvent::new(peer.clone(), new_position, clock.now()));
            history.append(peer, ContactEvent::new(agent.clone(), new_position, clock.now()));
        }

        Detection { moved: true, peers }
    }
}
