//! TUI screens: the login form plus one module per tab

pub mod dashboard;
pub mod import;
pub mod investments;
pub mod login;
pub mod transactions;

pub use dashboard::DashboardTab;
pub use import::ImportTab;
pub use investments::InvestmentsTab;
pub use login::LoginScreen;
pub use transactions::TransactionsTab;
