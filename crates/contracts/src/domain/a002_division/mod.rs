pub mod aggregate;

pub use aggregate::{Division, DivisionId};
