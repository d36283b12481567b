use std::sync::Arc;

use cinema_booking::{AdmissionEvent, BookingDesk};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::outcomes::OutcomeBoard;
use crate::queue::{AdmissionOutcome, QueuedBooking};

/// The single consumer of the admission queue.
///
/// Requests are taken one at a time, in submission order, and applied to the
/// shared desk under its write lock.
pub struct BookingWorker {
    rx: mpsc::Receiver<QueuedBooking>,
    desk: Arc<RwLock<BookingDesk>>,
    outcomes: Arc<OutcomeBoard>,
    events: broadcast::Sender<AdmissionEvent>,
}

impl BookingWorker {
    pub fn new(
        rx: mpsc::Receiver<QueuedBooking>,
        desk: Arc<RwLock<BookingDesk>>,
        outcomes: Arc<OutcomeBoard>,
        events: broadcast::Sender<AdmissionEvent>,
    ) -> Self {
        Self { rx, desk, outcomes, events }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Drain the queue until every submitter handle is gone.
    pub async fn run(mut self) {
        info!("Booking worker started, waiting for requests...");

        while let Some(job) = self.rx.recv().await {
            self.process(job).await;
        }

        info!("Booking queue closed, worker stopping");
    }

    async fn process(&self, job: QueuedBooking) {
        let QueuedBooking { request_id, request, reply } = job;

        let outcome: AdmissionOutcome = self.desk.write().await.admit(&request);

        match &outcome {
            Ok(admission) => {
                info!(
                    %request_id,
                    showtime = %admission.record.showtime,
                    seat = %admission.record.seat,
                    sold = admission.sold_tickets,
                    "Seat successfully booked for {}",
                    admission.record.name
                );
                // No subscribers is fine
                let _ = self.events.send(admission.event());
            }
            Err(err) => {
                warn!(%request_id, kind = err.kind(), "Booking rejected: {}", err);
            }
        }

        self.outcomes.complete(&request_id, &outcome).await;

        if reply.send(outcome).is_err() {
            tracing::debug!(%request_id, "Submitter no longer waiting for outcome");
        }
    }
}
