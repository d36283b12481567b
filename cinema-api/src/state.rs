use std::sync::Arc;

use cinema_booking::{AdmissionEvent, BookingDesk};
use cinema_store::app_config::QueueConfig;
use tokio::sync::{broadcast, RwLock};

use crate::outcomes::OutcomeBoard;
use crate::queue::AdmissionQueue;
use crate::worker::BookingWorker;

/// Buffered events per live-stream subscriber before it starts lagging.
const EVENT_BUFFER: usize = 100;

#[derive(Clone)]
pub struct AppState {
    /// Catalog and ledger. Every mutation takes the write lock.
    pub desk: Arc<RwLock<BookingDesk>>,
    pub queue: AdmissionQueue,
    pub events: broadcast::Sender<AdmissionEvent>,
}

impl AppState {
    /// Wire the shared state together with the worker that will own the
    /// receiving end of the queue. The worker still has to be spawned.
    pub fn new(desk: BookingDesk, queue_config: &QueueConfig) -> (Self, BookingWorker) {
        let desk = Arc::new(RwLock::new(desk));
        let outcomes = Arc::new(OutcomeBoard::new(queue_config.outcome_retention));
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let (queue, rx) = AdmissionQueue::new(queue_config.capacity, outcomes.clone());

        let worker = BookingWorker::new(rx, desk.clone(), outcomes, events.clone());
        (Self { desk, queue, events }, worker)
    }

    pub fn outcomes(&self) -> &Arc<OutcomeBoard> {
        self.queue.outcomes()
    }
}
