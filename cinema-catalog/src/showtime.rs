use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::CatalogError;
use crate::seat::SeatId;

/// Seating formation of a screening room. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formation {
    Teater,
    Arena,
    Lurus,
    Vip,
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Formation::Teater => "teater",
            Formation::Arena => "arena",
            Formation::Lurus => "lurus",
            Formation::Vip => "vip",
        };
        f.write_str(label)
    }
}

/// A scheduled screening with its own seat map and ticket counters.
///
/// `seats` maps every seat to its availability (`true` = free). The only
/// mutators are [`Showtime::hold`], [`Showtime::release`] and
/// [`Showtime::release_all`], which keep `sold_tickets` equal to the number
/// of held seats and never let it exceed `max_tickets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Showtime {
    pub movie: String,
    seats: BTreeMap<SeatId, bool>,
    sold_tickets: u32,
    max_tickets: u32,
    pub formation: Formation,
}

impl Showtime {
    /// Build a showtime with every seat of a `rows` × `1..=seats_per_row` grid free.
    pub fn with_grid(
        movie: impl Into<String>,
        formation: Formation,
        rows: &str,
        seats_per_row: u16,
        max_tickets: u32,
    ) -> Self {
        let seats = rows
            .chars()
            .flat_map(|row| (1..=seats_per_row).map(move |n| (SeatId::new(row, n), true)))
            .collect();

        Self {
            movie: movie.into(),
            seats,
            sold_tickets: 0,
            max_tickets,
            formation,
        }
    }

    pub fn sold_tickets(&self) -> u32 {
        self.sold_tickets
    }

    pub fn max_tickets(&self) -> u32 {
        self.max_tickets
    }

    pub fn is_sold_out(&self) -> bool {
        self.sold_tickets >= self.max_tickets
    }

    /// `Some(true)` if the seat is free, `Some(false)` if held, `None` if the
    /// seat does not exist in this showtime.
    pub fn seat_available(&self, seat: &SeatId) -> Option<bool> {
        self.seats.get(seat).copied()
    }

    pub fn seats(&self) -> impl Iterator<Item = (&SeatId, bool)> {
        self.seats.iter().map(|(id, free)| (id, *free))
    }

    pub fn held_count(&self) -> usize {
        self.seats.values().filter(|free| !**free).count()
    }

    /// Seats grouped by row, in row-major order.
    pub fn seat_rows(&self) -> Vec<(char, Vec<(SeatId, bool)>)> {
        let mut rows: Vec<(char, Vec<(SeatId, bool)>)> = Vec::new();
        for (id, free) in &self.seats {
            match rows.last_mut() {
                Some((row, seats)) if *row == id.row() => seats.push((*id, *free)),
                _ => rows.push((id.row(), vec![(*id, *free)])),
            }
        }
        rows
    }

    /// Available -> Held.
    pub fn hold(&mut self, seat: &SeatId) -> Result<(), CatalogError> {
        if self.is_sold_out() {
            return Err(CatalogError::SoldOut {
                sold: self.sold_tickets,
                max: self.max_tickets,
            });
        }

        let free = self
            .seats
            .get_mut(seat)
            .ok_or_else(|| CatalogError::UnknownSeat(seat.to_string()))?;

        if !*free {
            return Err(CatalogError::SeatAlreadyHeld(*seat));
        }

        *free = false;
        self.sold_tickets += 1;
        debug_assert_eq!(self.sold_tickets as usize, self.held_count());
        Ok(())
    }

    /// Held -> Available. Returns `false` when the seat was already free.
    pub fn release(&mut self, seat: &SeatId) -> Result<bool, CatalogError> {
        let free = self
            .seats
            .get_mut(seat)
            .ok_or_else(|| CatalogError::UnknownSeat(seat.to_string()))?;

        if *free {
            return Ok(false);
        }

        *free = true;
        self.sold_tickets = self.sold_tickets.saturating_sub(1);
        Ok(true)
    }

    /// Free every held seat. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for free in self.seats.values_mut().filter(|free| !**free) {
            *free = true;
            released += 1;
        }
        self.sold_tickets = 0;
        released
    }
}
