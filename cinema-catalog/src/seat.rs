use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A seat position within a showtime: row letter plus seat number (e.g. `C7`).
///
/// Ordering is row-major, so `A2` comes before `A10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatId {
    row: char,
    number: u16,
}

impl SeatId {
    pub fn new(row: char, number: u16) -> Self {
        Self { row, number }
    }

    pub fn row(&self) -> char {
        self.row
    }

    pub fn number(&self) -> u16 {
        self.number
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Not a seat identifier: {0:?}")]
pub struct ParseSeatError(pub String);

impl FromStr for SeatId {
    type Err = ParseSeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let row = chars
            .next()
            .filter(|c| c.is_ascii_uppercase())
            .ok_or_else(|| ParseSeatError(s.to_string()))?;

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
            return Err(ParseSeatError(s.to_string()));
        }

        let number = digits
            .parse::<u16>()
            .map_err(|_| ParseSeatError(s.to_string()))?;

        Ok(Self { row, number })
    }
}

// Seats travel as their display form ("A1") so that seat maps serialize as
// plain JSON objects.
impl Serialize for SeatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
