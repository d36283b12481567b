use chrono::{Local, NaiveDateTime};
use cinema_catalog::{CatalogError, SeatId, ShowtimeCatalog};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BookingError, SeatUnavailableReason};
use crate::events::AdmissionEvent;
use crate::ledger::{BookingLedger, BookingRecord};
use crate::request::BookingRequest;

/// Which seats a successful delete-by-name frees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Legacy behaviour: free every held seat of every showtime, whoever
    /// booked it. Records of other bookers stay in the ledger.
    #[default]
    GlobalReset,
    /// Free only the seats named by the deleted records.
    PerBooking,
}

/// Result of a successful admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admission {
    pub record: BookingRecord,
    pub sold_tickets: u32,
    pub max_tickets: u32,
}

impl Admission {
    pub fn event(&self) -> AdmissionEvent {
        AdmissionEvent::SeatHeld {
            showtime: self.record.showtime.clone(),
            seat: self.record.seat.to_string(),
            name: self.record.name.clone(),
            purchase_date: self.record.purchase_date_display(),
        }
    }
}

/// Result of a successful delete-by-name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deletion {
    pub name: String,
    pub records_removed: usize,
    pub seats_released: usize,
}

impl Deletion {
    pub fn event(&self) -> AdmissionEvent {
        AdmissionEvent::SeatsReleased {
            name: self.name.clone(),
            records_removed: self.records_removed,
            seats_released: self.seats_released,
        }
    }
}

/// Read-only copy of the whole booking state, for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct DeskSnapshot {
    pub showtimes: ShowtimeCatalog,
    pub bookings: BookingLedger,
}

/// Owner of the showtime catalog and the booking ledger.
///
/// Every seat or ledger mutation goes through `&mut self`; callers that share
/// a desk across tasks put it behind one lock so admissions and deletions
/// never interleave.
#[derive(Debug, Clone)]
pub struct BookingDesk {
    catalog: ShowtimeCatalog,
    ledger: BookingLedger,
    release_policy: ReleasePolicy,
}

impl BookingDesk {
    pub fn new(catalog: ShowtimeCatalog, release_policy: ReleasePolicy) -> Self {
        Self {
            catalog,
            ledger: BookingLedger::new(),
            release_policy,
        }
    }

    /// Stock catalog, empty ledger.
    pub fn seeded(release_policy: ReleasePolicy) -> Self {
        Self::new(ShowtimeCatalog::seeded(), release_policy)
    }

    pub fn catalog(&self) -> &ShowtimeCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &BookingLedger {
        &self.ledger
    }

    pub fn release_policy(&self) -> ReleasePolicy {
        self.release_policy
    }

    pub fn snapshot(&self) -> DeskSnapshot {
        DeskSnapshot {
            showtimes: self.catalog.clone(),
            bookings: self.ledger.clone(),
        }
    }

    /// Admit a request, stamping the record with the current local time.
    pub fn admit(&mut self, request: &BookingRequest) -> Result<Admission, BookingError> {
        self.admit_at(request, Local::now().naive_local())
    }

    /// Admit a request with an explicit purchase time.
    ///
    /// Checks run in order and the first failure wins: field presence,
    /// showtime lookup, capacity, seat availability.
    pub fn admit_at(
        &mut self,
        request: &BookingRequest,
        purchase_date: NaiveDateTime,
    ) -> Result<Admission, BookingError> {
        let request = request.validate()?;

        let showtime = self
            .catalog
            .get_mut(&request.showtime)
            .map_err(|_| BookingError::ShowtimeNotFound(request.showtime.clone()))?;

        if showtime.is_sold_out() {
            return Err(BookingError::CapacityExceeded {
                showtime: request.showtime,
                max: showtime.max_tickets(),
            });
        }

        let unavailable = |reason| BookingError::SeatUnavailable {
            showtime: request.showtime.clone(),
            seat: request.seat.clone(),
            reason,
        };

        let seat: SeatId = request
            .seat
            .parse()
            .map_err(|_| unavailable(SeatUnavailableReason::UnknownSeat))?;

        showtime.hold(&seat).map_err(|err| match err {
            CatalogError::SeatAlreadyHeld(_) => unavailable(SeatUnavailableReason::AlreadyHeld),
            CatalogError::SoldOut { max, .. } => BookingError::CapacityExceeded {
                showtime: request.showtime.clone(),
                max,
            },
            CatalogError::UnknownSeat(_) | CatalogError::NotFound(_) => {
                unavailable(SeatUnavailableReason::UnknownSeat)
            }
        })?;

        let record = BookingRecord {
            name: request.name.clone(),
            movie: showtime.movie.clone(),
            showtime: request.showtime.clone(),
            seat,
            purchase_date,
        };
        let admission = Admission {
            record: record.clone(),
            sold_tickets: showtime.sold_tickets(),
            max_tickets: showtime.max_tickets(),
        };

        self.ledger.append(record);
        Ok(admission)
    }

    /// Remove every booking made under `name`, then free seats according to
    /// the desk's [`ReleasePolicy`].
    pub fn delete_by_name(&mut self, name: &str) -> Result<Deletion, BookingError> {
        if name.is_empty() {
            return Err(BookingError::MissingFields(vec!["name"]));
        }

        let removed = self.ledger.remove_by_name(name);
        if removed.is_empty() {
            return Err(BookingError::BookingNotFound(name.to_string()));
        }

        let seats_released = match self.release_policy {
            ReleasePolicy::GlobalReset => self.release_all_holds(),
            ReleasePolicy::PerBooking => self.release_records(&removed),
        };

        Ok(Deletion {
            name: name.to_string(),
            records_removed: removed.len(),
            seats_released,
        })
    }

    /// Legacy global rollback: every held seat in every showtime becomes
    /// available again and every `sold_tickets` drops to zero.
    pub fn release_all_holds(&mut self) -> usize {
        self.catalog.release_all()
    }

    fn release_records(&mut self, records: &[BookingRecord]) -> usize {
        let mut released = 0;
        for record in records {
            let result = self
                .catalog
                .get_mut(&record.showtime)
                .and_then(|showtime| showtime.release(&record.seat));
            match result {
                Ok(true) => released += 1,
                Ok(false) => {}
                Err(e) => warn!("Booking record points at a missing seat: {}", e),
            }
        }
        released
    }

    /// `sold_tickets` matches the held seats and stays within capacity for
    /// every showtime.
    pub fn is_consistent(&self) -> bool {
        self.catalog.iter().all(|(_, showtime)| {
            showtime.sold_tickets() as usize == showtime.held_count()
                && showtime.sold_tickets() <= showtime.max_tickets()
        })
    }
}
