use crate::common::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single grid cell. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<[u32; 2]> for Position {
    fn from([x, y]: [u32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [u32; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Square grid of `size` x `size` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    size: u32,
}

impl Board {
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x < self.size && position.y < self.size
    }

    pub fn check(&self, position: Position) -> DomainResult<Position> {
        if self.contains(position) {
            Ok(position)
        } else {
            Err(DomainError::OutOfBounds {
                x: position.x,
                y: position.y,
                board_size: self.size,
            })
        }
    }

    /// Moves `position` by `(dx, dy)`, clamping each axis to the board.
    pub fn step(&self, position: Position, dx: i64, dy: i64) -> Position {
        let max = i64::from(self.size.saturating_sub(1));
        let clamp = |v: u32, d: i64| (i64::from(v) + d).clamp(0, max) as u32;
        Position::new(clamp(position.x, dx), clamp(position.y, dy))
    }
}

/// "The owning agent was at `position` together with `peer` at `timestamp`."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub peer: AgentId,
    pub position: Position,
    pub timestamp: DateTime<Utc>,
}

impl ContactEvent {
    pub fn new(peer: AgentId, position: Position, timestamp: DateTime<Utc>) -> Self {
        Self {
            peer,
            position,
            timestamp,
        }
    }
}

/// Answer to a contact-history query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub agent: AgentId,
    pub contacts: Vec<ContactEvent>,
    pub timestamp: DateTime<Utc>,
}
