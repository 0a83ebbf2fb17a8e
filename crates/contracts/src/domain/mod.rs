pub mod common;

pub mod a001_station;
pub mod a002_division;
pub mod a003_member;
pub mod a004_interest_rate;
