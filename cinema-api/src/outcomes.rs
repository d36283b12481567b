use std::collections::{HashMap, VecDeque};

use cinema_booking::{Admission, BookingError};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::queue::AdmissionOutcome;

/// Where a submitted request currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Pending,
    Admitted(Admission),
    Rejected(BookingError),
}

impl From<AdmissionOutcome> for OutcomeStatus {
    fn from(outcome: AdmissionOutcome) -> Self {
        match outcome {
            Ok(admission) => OutcomeStatus::Admitted(admission),
            Err(err) => OutcomeStatus::Rejected(err),
        }
    }
}

/// JSON view of an [`OutcomeStatus`].
#[derive(Debug, Serialize)]
pub struct OutcomeView {
    pub request_id: Uuid,
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<Admission>,
}

impl OutcomeView {
    pub fn new(request_id: Uuid, status: OutcomeStatus) -> Self {
        match status {
            OutcomeStatus::Pending => Self {
                request_id,
                status: "queued",
                message: "Booking request has been queued.".to_string(),
                kind: None,
                booking: None,
            },
            OutcomeStatus::Admitted(admission) => Self {
                request_id,
                status: "success",
                message: "Seat successfully booked!".to_string(),
                kind: None,
                booking: Some(admission),
            },
            OutcomeStatus::Rejected(err) => Self {
                request_id,
                status: "error",
                message: err.to_string(),
                kind: Some(err.kind()),
                booking: None,
            },
        }
    }
}

#[derive(Default)]
struct Entries {
    by_id: HashMap<Uuid, OutcomeStatus>,
    order: VecDeque<Uuid>,
}

/// Outcomes of submitted requests, kept so a caller that only received the
/// "queued" acknowledgment can look the result up later.
///
/// Holds at most `retention` entries; the oldest submission is evicted first.
pub struct OutcomeBoard {
    entries: Mutex<Entries>,
    retention: usize,
}

impl OutcomeBoard {
    pub fn new(retention: usize) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            retention: retention.max(1),
        }
    }

    pub async fn register(&self, request_id: Uuid) {
        let mut entries = self.entries.lock().await;
        entries.by_id.insert(request_id, OutcomeStatus::Pending);
        entries.order.push_back(request_id);

        while entries.order.len() > self.retention {
            if let Some(oldest) = entries.order.pop_front() {
                entries.by_id.remove(&oldest);
            }
        }
    }

    /// Record a finished outcome. Ignored if the entry was already evicted.
    pub async fn complete(&self, request_id: &Uuid, outcome: &AdmissionOutcome) {
        let mut entries = self.entries.lock().await;
        if let Some(status) = entries.by_id.get_mut(request_id) {
            *status = outcome.clone().into();
        }
    }

    pub async fn get(&self, request_id: &Uuid) -> Option<OutcomeStatus> {
        self.entries.lock().await.by_id.get(request_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.by_id.len()
    }
}
