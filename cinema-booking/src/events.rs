use serde::{Deserialize, Serialize};

/// State change notifications for live observers of the seat maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdmissionEvent {
    SeatHeld {
        showtime: String,
        seat: String,
        name: String,
        purchase_date: String,
    },
    SeatsReleased {
        name: String,
        records_removed: usize,
        seats_released: usize,
    },
}
