use chrono::NaiveDateTime;
use cinema_catalog::SeatId;
use serde::{Deserialize, Serialize};

/// Display format of purchase timestamps.
pub const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A completed booking. Never mutated once appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub name: String,
    pub movie: String,
    pub showtime: String,
    pub seat: SeatId,
    #[serde(with = "purchase_date")]
    pub purchase_date: NaiveDateTime,
}

impl BookingRecord {
    pub fn purchase_date_display(&self) -> String {
        self.purchase_date.format(PURCHASE_DATE_FORMAT).to_string()
    }
}

mod purchase_date {
    use super::PURCHASE_DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(PURCHASE_DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, PURCHASE_DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Bookings in the order they were admitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingLedger {
    records: Vec<BookingRecord>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: BookingRecord) {
        self.records.push(record);
    }

    /// Remove every record booked under `name` (exact, case-sensitive match)
    /// and return them in ledger order.
    pub fn remove_by_name(&mut self, name: &str) -> Vec<BookingRecord> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|record| record.name == name);
        self.records = kept;
        removed
    }

    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a BookingRecord> + 'a {
        self.records.iter().filter(move |record| record.name == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
