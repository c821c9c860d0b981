use super::contact_history::ContactHistory;
use super::detector::{ContactDetector, Detection};
use super::position_store::PositionStore;
use super::responder::QueryResponder;
use super::types::{AgentId, Board, Position, QueryResult};
use crate::common::{ApplicationError, ApplicationResult, DomainResult, DynClock, SystemClock};
use crate::config::TrackerConfig;
use crate::domains::logger::DynLogger;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Positions and histories are guarded together so that a position write and the
/// contacts it produces land in one critical section.
#[derive(Debug)]
struct TrackerState {
    positions: PositionStore,
    history: ContactHistory,
}

struct TrackerInner {
    state: Mutex<TrackerState>,
    board: Board,
    clock: DynClock,
    logger: DynLogger,
}

/// Thread-safe facade over the contact-tracing core. Cloning shares the same state.
#[derive(Clone)]
pub struct Tracker {
    inner: Arc<TrackerInner>,
}

impl Tracker {
    pub fn new(board: Board, max_history: NonZeroUsize, logger: DynLogger) -> Self {
        Self::with_clock(board, max_history, logger, Arc::new(SystemClock))
    }

    pub fn with_clock(
        board: Board,
        max_history: NonZeroUsize,
        logger: DynLogger,
        clock: DynClock,
    ) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                state: Mutex::new(TrackerState {
                    positions: PositionStore::new(),
                    history: ContactHistory::new(max_history),
                }),
                board,
                clock,
                logger,
            }),
        }
    }

    pub fn from_config(config: &TrackerConfig, logger: DynLogger) -> ApplicationResult<Self> {
        if config.board_size == 0 {
            return Err(ApplicationError::Configuration(
                "tracker.board_size must be positive".to_string(),
            ));
        }
        let max_history = NonZeroUsize::new(config.max_history).ok_or_else(|| {
            ApplicationError::Configuration("tracker.max_history must be positive".to_string())
        })?;
        Ok(Self::new(Board::new(config.board_size), max_history, logger))
    }

    pub fn board(&self) -> Board {
        self.inner.board
    }

    /// Applies one position report. Positions off the board are rejected without
    /// touching any state.
    pub fn ingest_position(&self, agent: &AgentId, position: Position) -> DomainResult<Detection> {
        let position = self.inner.board.check(position)?;

        let detection = {
            let mut state = self.lock();
            let TrackerState { positions, history } = &mut *state;
            ContactDetector::on_position_update(
                positions,
                history,
                agent,
                position,
                self.inner.clock.as_ref(),
            )
        };

        for peer in &detection.peers {
            self.inner.logger.info(&format!(
                "CONTACT DETECTED: {} and {} at {}",
                agent, peer, position
            ));
        }
        Ok(detection)
    }

    pub fn query_contacts(&self, agent: &AgentId) -> QueryResult {
        let state = self.lock();
        QueryResponder::respond(&state.history, agent, self.inner.clock.now())
    }

    pub fn position_of(&self, agent: &AgentId) -> Option<Position> {
        self.lock().positions.position_of(agent)
    }

    pub fn all_positions(&self) -> Vec<(AgentId, Position)> {
        self.lock().positions.all_positions()
    }

    pub fn tracked_agents(&self) -> usize {
        self.lock().positions.len()
    }

    // Every critical section leaves the state consistent, so a panic in another
    // holder does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
