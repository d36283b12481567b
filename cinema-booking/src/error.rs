use serde::Serialize;
use std::fmt;

/// Why a seat could not be admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatUnavailableReason {
    AlreadyHeld,
    UnknownSeat,
}

impl fmt::Display for SeatUnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatUnavailableReason::AlreadyHeld => f.write_str("already booked"),
            SeatUnavailableReason::UnknownSeat => f.write_str("invalid seat"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("Missing booking information: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Showtime not found: {0}")]
    ShowtimeNotFound(String),

    #[error("Maximum number of tickets sold for showtime {showtime} ({max})")]
    CapacityExceeded {
        showtime: String,
        max: u32,
    },

    #[error("Seat {seat} for showtime {showtime} is unavailable: {reason}")]
    SeatUnavailable {
        showtime: String,
        seat: String,
        reason: SeatUnavailableReason,
    },

    #[error("No bookings found with the given name: {0}")]
    BookingNotFound(String),
}

impl BookingError {
    /// Stable machine-readable kind, used in API payloads and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::MissingFields(_) => "missing_fields",
            BookingError::ShowtimeNotFound(_) => "showtime_not_found",
            BookingError::CapacityExceeded { .. } => "capacity_exceeded",
            BookingError::SeatUnavailable { .. } => "seat_unavailable",
            BookingError::BookingNotFound(_) => "booking_not_found",
        }
    }
}
