//! financer-core - Core library for financer
//!
//! Provides the finance API client, models, month aggregation, client-side
//! validation and the event bus shared by the frontends.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod event;
pub mod flows;
pub mod import;
pub mod models;
pub mod validate;

pub use aggregate::{grand_total, MeiAlert, MonthFilter};
pub use api::FinanceClient;
pub use config::FinancerConfig;
pub use error::{Alert, CoreError, ErrorKind, Severity};
pub use event::{EventBus, FinanceEvent, Generation};
pub use import::{ImportSelection, SelectedFile};
pub use models::{Investment, InvestmentId, MonthlyBalance, Session, Transaction, TransactionId};
pub use validate::{CategoryUpdate, Credentials, NewInvestment, Registration};
