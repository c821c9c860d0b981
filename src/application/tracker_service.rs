// Tracker Service - drives the tracker from transport ports
use crate::domains::contact_tracing::{PositionSource, QueryChannel, QueryReply, Tracker};
use crate::domains::DynLogger;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub accepted: u64,
    pub rejected: u64,
    pub contacts: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueryStats {
    pub answered: u64,
    pub rejected: u64,
    pub failed_replies: u64,
}

/// Connects a [`Tracker`] to its transport. Each source is drained by one task in
/// delivery order; malformed events are logged and dropped.
#[derive(Clone)]
pub struct TrackerService {
    tracker: Tracker,
    logger: DynLogger,
}

impl TrackerService {
    pub fn new(tracker: Tracker, logger: DynLogger) -> Self {
        Self { tracker, logger }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Runs until the source is exhausted or shutdown is requested.
    pub async fn run_positions<S: PositionSource>(
        &self,
        mut source: S,
        mut shutdown: watch::Receiver<bool>,
    ) -> IngestStats {
        let mut stats = IngestStats::default();
        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                next = source.next_update() => next,
            };

            let update = match next {
                None => break,
                Some(Ok(update)) => update,
                Some(Err(e)) => {
                    stats.rejected += 1;
                    self.logger.warn(&format!("Dropping position update: {}", e));
                    continue;
                }
            };

            match self.tracker.ingest_position(&update.agent_id, update.position) {
                Ok(detection) => {
                    stats.accepted += 1;
                    stats.contacts += detection.peers.len() as u64;
                    tracing::debug!("Updated position for {}: {}", update.agent_id, update.position);
                }
                Err(e) => {
                    stats.rejected += 1;
                    self.logger.warn(&format!(
                        "Dropping position update for {}: {}",
                        update.agent_id, e
                    ));
                }
            }
        }
        stats
    }

    /// Answers queries until the channel closes or shutdown is requested.
    pub async fn run_queries<C: QueryChannel>(
        &self,
        mut channel: C,
        mut shutdown: watch::Receiver<bool>,
    ) -> QueryStats {
        let mut stats = QueryStats::default();
        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                next = channel.next_query() => next,
            };

            let request = match next {
                None => break,
                Some(Ok(request)) => request,
                Some(Err(e)) => {
                    stats.rejected += 1;
                    self.logger.warn(&format!("Dropping contact query: {}", e));
                    continue;
                }
            };

            tracing::info!(
                "Processing query for {} (reply_to: {})",
                request.agent_id,
                request.reply_to
            );
            let result = self.tracker.query_contacts(&request.agent_id);
            let count = result.contacts.len();
            let reply = QueryReply::from_result(result, request.correlation_id);

            match channel.reply(&request, reply).await {
                Ok(()) => {
                    stats.answered += 1;
                    tracing::info!("Sent response for {} with {} contacts", request.agent_id, count);
                }
                Err(e) => {
                    stats.failed_replies += 1;
                    self.logger.error(&format!(
                        "Failed to reply to query for {}: {}",
                        request.agent_id, e
                    ));
                }
            }
        }
        stats
    }

    pub fn spawn_positions<S>(&self, source: S, shutdown: watch::Receiver<bool>) -> JoinHandle<IngestStats>
    where
        S: PositionSource + 'static,
    {
        let service = self.clone();
        tokio::spawn(async move { service.run_positions(source, shutdown).await })
    }

    pub fn spawn_queries<C>(&self, channel: C, shutdown: watch::Receiver<bool>) -> JoinHandle<QueryStats>
    where
        C: QueryChannel + 'static,
    {
        let service = self.clone();
        tokio::spawn(async move { service.run_queries(channel, shutdown).await })
    }
}

/// Resolves once the flag is set or every sender is gone.
pub async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
