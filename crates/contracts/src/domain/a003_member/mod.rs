pub mod aggregate;

pub use aggregate::{Member, MemberId, SavingsAccount, Wallet};
