use super::messages::PositionUpdate;
use super::ports::PositionSink;
use super::types::{AgentId, Board, Position};
use crate::common::{to_epoch_seconds, Clock, TransportResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use tokio::sync::watch;

const DIRECTIONS: [(i64, i64); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Random-walk publisher for one agent. Moves one cell (including diagonals) per
/// tick, clamped to the board, at `speed` moves per second.
pub struct AgentSimulator {
    agent_id: AgentId,
    speed: f64,
    board: Board,
    position: Position,
    rng: StdRng,
}

impl AgentSimulator {
    /// Places the agent on a random cell.
    pub fn new(agent_id: AgentId, speed: f64, board: Board, mut rng: StdRng) -> Self {
        let size = board.size().max(1);
        let position = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
        Self {
            agent_id,
            speed,
            board,
            position,
            rng,
        }
    }

    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.speed).unwrap_or(Duration::from_secs(1))
    }

    pub fn step(&mut self) -> Position {
        let (dx, dy) = *DIRECTIONS
            .choose(&mut self.rng)
            .unwrap_or(&DIRECTIONS[0]);
        self.position = self.board.step(self.position, dx, dy);
        self.position
    }

    pub fn current_update(&self, clock: &dyn Clock) -> PositionUpdate {
        PositionUpdate::new(
            self.agent_id.clone(),
            self.position,
            to_epoch_seconds(clock.now()),
        )
    }

    /// Publishes the starting cell, then one report per tick until `shutdown` flips
    /// to true or its sender is dropped. Publish failures are logged and skipped.
    pub async fn run(
        mut self,
        sink: &dyn PositionSink,
        clock: &dyn Clock,
        mut shutdown: watch::Receiver<bool>,
    ) -> TransportResult<()> {
        tracing::info!("Agent {} started at {}", self.agent_id, self.position);
        self.publish(sink, clock).await;

        let mut ticker = tokio::time::interval(self.tick_interval());
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.step();
                    self.publish(sink, clock).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Stopping {}", self.agent_id);
        Ok(())
    }

    async fn publish(&self, sink: &dyn PositionSink, clock: &dyn Clock) {
        let update = self.current_update(clock);
        match sink.publish(&update).await {
            Ok(()) => tracing::debug!("{} published position {}", self.agent_id, self.position),
            Err(e) => tracing::error!("Failed to publish position for {}: {}", self.agent_id, e),
        }
    }
}
