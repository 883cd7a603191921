//! Data models for financer
//!
//! Field names follow the finance API wire format via serde renames.

pub mod amount;
pub mod balance;
pub mod investment;
pub mod session;
pub mod transaction;

pub use balance::MonthlyBalance;
pub use investment::{Investment, InvestmentId};
pub use session::Session;
pub use transaction::{Transaction, TransactionId};
