pub mod seat;
pub mod showtime;
pub mod catalog;

pub use seat::SeatId;
pub use showtime::{Formation, Showtime};
pub use catalog::{CatalogError, ShowtimeCatalog};
