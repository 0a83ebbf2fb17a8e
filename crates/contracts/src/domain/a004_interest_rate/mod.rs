pub mod aggregate;

pub use aggregate::{InterestRate, RateType};
