pub mod error;
pub mod request;
pub mod ledger;
pub mod events;
pub mod desk;

pub use error::{BookingError, SeatUnavailableReason};
pub use request::{BookingRequest, ValidBookingRequest};
pub use ledger::{BookingLedger, BookingRecord};
pub use events::AdmissionEvent;
pub use desk::{Admission, BookingDesk, DeskSnapshot, Deletion, ReleasePolicy};
