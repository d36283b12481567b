use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// A booking request as submitted by a caller. Every field may be absent;
/// presence is checked when the request is admitted, not when it is queued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub showtime: Option<String>,
    #[serde(default)]
    pub seat: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A request whose three fields are all present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBookingRequest {
    pub showtime: String,
    pub seat: String,
    pub name: String,
}

impl BookingRequest {
    pub fn new(
        showtime: impl Into<String>,
        seat: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            showtime: Some(showtime.into()),
            seat: Some(seat.into()),
            name: Some(name.into()),
        }
    }

    /// Presence check. Empty strings count as missing.
    pub fn validate(&self) -> Result<ValidBookingRequest, BookingError> {
        fn present(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|v| !v.is_empty())
        }

        let showtime = present(&self.showtime);
        let seat = present(&self.seat);
        let name = present(&self.name);

        match (showtime, seat, name) {
            (Some(showtime), Some(seat), Some(name)) => Ok(ValidBookingRequest {
                showtime: showtime.to_string(),
                seat: seat.to_string(),
                name: name.to_string(),
            }),
            _ => {
                let missing = [("showtime", showtime), ("seat", seat), ("name", name)]
                    .into_iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(field, _)| field)
                    .collect();
                Err(BookingError::MissingFields(missing))
            }
        }
    }
}
