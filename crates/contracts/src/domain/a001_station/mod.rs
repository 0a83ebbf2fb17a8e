pub mod aggregate;

pub use aggregate::{Station, StationId};
