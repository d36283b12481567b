use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::seat::SeatId;
use crate::showtime::{Formation, Showtime};

/// Rows of the stock screening room.
pub const SEED_ROWS: &str = "ABCDE";
/// Seats per row of the stock screening room.
pub const SEED_SEATS_PER_ROW: u16 = 10;
/// Ticket cap of every seeded showtime.
pub const SEED_MAX_TICKETS: u32 = 50;

const SEED: [(&str, &str, Formation); 4] = [
    ("2024-06-26 10:00", "Galaksi Jauh: Petualangan Antar Bintang", Formation::Teater),
    ("2024-06-26 13:00", "Legenda Raja Laut: Kembalinya Sang Pahlawan", Formation::Arena),
    ("2024-06-26 16:00", "Misteri Pulau Hantu", Formation::Lurus),
    ("2024-06-26 19:00", "Petualangan Waktu: Mesin Penjelajah Masa", Formation::Vip),
];

/// Registry of showtimes keyed by their schedule string (`"YYYY-MM-DD HH:MM"`).
///
/// The set of showtimes is fixed once the service starts; only seat state
/// changes afterwards. No internal locking: the owner serializes access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowtimeCatalog {
    showtimes: BTreeMap<String, Showtime>,
}

impl ShowtimeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock programme: four screenings, 5 × 10 seats each.
    pub fn seeded() -> Self {
        let mut catalog = Self::new();
        for (key, movie, formation) in SEED {
            catalog.insert(
                key,
                Showtime::with_grid(movie, formation, SEED_ROWS, SEED_SEATS_PER_ROW, SEED_MAX_TICKETS),
            );
        }
        catalog
    }

    /// Register a showtime. Only used while assembling a catalog.
    pub fn insert(&mut self, key: impl Into<String>, showtime: Showtime) {
        self.showtimes.insert(key.into(), showtime);
    }

    pub fn get(&self, key: &str) -> Result<&Showtime, CatalogError> {
        self.showtimes
            .get(key)
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut Showtime, CatalogError> {
        self.showtimes
            .get_mut(key)
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.showtimes.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Showtime)> {
        self.showtimes.iter()
    }

    pub fn len(&self) -> usize {
        self.showtimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.showtimes.is_empty()
    }

    /// Free every held seat of every showtime. Returns the number released.
    pub fn release_all(&mut self) -> usize {
        self.showtimes.values_mut().map(Showtime::release_all).sum()
    }

    /// Total held seats across the catalog.
    pub fn held_count(&self) -> usize {
        self.showtimes.values().map(Showtime::held_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Showtime not found: {0}")]
    NotFound(String),

    #[error("Unknown seat: {0}")]
    UnknownSeat(String),

    #[error("Seat already booked: {0}")]
    SeatAlreadyHeld(SeatId),

    #[error("Maximum number of tickets sold: {sold} of {max}")]
    SoldOut {
        sold: u32,
        max: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let catalog = ShowtimeCatalog::seeded();
        assert_eq!(catalog.len(), 4);

        let show = catalog.get("2024-06-26 10:00").unwrap();
        assert_eq!(show.movie, "Galaksi Jauh: Petualangan Antar Bintang");
        assert_eq!(show.formation, Formation::Teater);
        assert_eq!(show.max_tickets(), 50);
        assert_eq!(show.sold_tickets(), 0);
        assert_eq!(show.seats().count(), 50);

        let keys: Vec<&String> = catalog.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["2024-06-26 10:00", "2024-06-26 13:00", "2024-06-26 16:00", "2024-06-26 19:00"]
        );
    }

    #[test]
    fn test_unknown_showtime() {
        let catalog = ShowtimeCatalog::seeded();
        let err = catalog.get("2030-01-01 00:00").unwrap_err();
        assert_eq!(err, CatalogError::NotFound("2030-01-01 00:00".to_string()));
    }

    #[test]
    fn test_release_all_spans_showtimes() {
        let mut catalog = ShowtimeCatalog::seeded();
        let a1: SeatId = "A1".parse().unwrap();
        let b2: SeatId = "B2".parse().unwrap();

        catalog.get_mut("2024-06-26 10:00").unwrap().hold(&a1).unwrap();
        catalog.get_mut("2024-06-26 19:00").unwrap().hold(&b2).unwrap();
        assert_eq!(catalog.held_count(), 2);

        assert_eq!(catalog.release_all(), 2);
        assert_eq!(catalog.held_count(), 0);
        for (_, show) in catalog.iter() {
            assert_eq!(show.sold_tickets(), 0);
        }
    }
}
