//! Admission queue between the HTTP handlers and the booking worker.
//!
//! Submissions never wait: the channel is bounded and a full queue turns the
//! request away with [`QueueError::Full`]. Each queued booking carries a
//! request id and a oneshot sender the worker answers on.

use std::sync::Arc;

use cinema_booking::{Admission, BookingError, BookingRequest};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::outcomes::OutcomeBoard;

pub type AdmissionOutcome = Result<Admission, BookingError>;

/// A booking waiting for the worker.
#[derive(Debug)]
pub struct QueuedBooking {
    pub request_id: Uuid,
    pub request: BookingRequest,
    pub reply: oneshot::Sender<AdmissionOutcome>,
}

/// Handle returned to the submitter.
#[derive(Debug)]
pub struct AdmissionTicket {
    pub request_id: Uuid,
    outcome: oneshot::Receiver<AdmissionOutcome>,
}

impl AdmissionTicket {
    /// Wait for the worker to process the request.
    pub async fn outcome(self) -> Result<AdmissionOutcome, QueueError> {
        self.outcome.await.map_err(|_| QueueError::Closed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Booking queue is full ({0} pending)")]
    Full(usize),

    #[error("Booking worker is not running")]
    Closed,
}

#[derive(Clone)]
pub struct AdmissionQueue {
    tx: mpsc::Sender<QueuedBooking>,
    outcomes: Arc<OutcomeBoard>,
}

impl AdmissionQueue {
    pub fn new(capacity: usize, outcomes: Arc<OutcomeBoard>) -> (Self, mpsc::Receiver<QueuedBooking>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx, outcomes }, rx)
    }

    /// Enqueue a booking without waiting for room.
    ///
    /// A slot is reserved before the request id is put on the outcome board,
    /// so a rejected submission never touches the board.
    pub async fn submit(&self, request: BookingRequest) -> Result<AdmissionTicket, QueueError> {
        let permit = self.tx.try_reserve().map_err(|err| match err {
            mpsc::error::TrySendError::Full(()) => QueueError::Full(self.depth()),
            mpsc::error::TrySendError::Closed(()) => QueueError::Closed,
        })?;

        let request_id = Uuid::new_v4();
        let (reply, outcome) = oneshot::channel();

        // Registered before sending so the worker can never finish first.
        self.outcomes.register(request_id).await;

        permit.send(QueuedBooking { request_id, request, reply });
        Ok(AdmissionTicket { request_id, outcome })
    }

    /// Requests waiting to be processed.
    pub fn depth(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn outcomes(&self) -> &Arc<OutcomeBoard> {
        &self.outcomes
    }
}
