//! Bank statement transactions

use super::amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for transaction IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub i64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TransactionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A single imported statement line.
///
/// Only `category` changes after creation, through the categorize endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// ISO-like date, `YYYY-MM-DD...`
    #[serde(rename = "data", default)]
    pub date: String,

    #[serde(rename = "tipo", default)]
    pub kind: String,

    #[serde(rename = "detalhe", default)]
    pub detail: String,

    #[serde(rename = "credito", default, deserialize_with = "amount::lenient_or_zero")]
    pub credit: f64,

    #[serde(rename = "debito", default, deserialize_with = "amount::lenient_or_zero")]
    pub debit: f64,

    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
}

impl Transaction {
    /// Year-month prefix of the date (first 7 characters)
    pub fn month_prefix(&self) -> &str {
        match self.date.char_indices().nth(7) {
            Some((idx, _)) => &self.date[..idx],
            None => &self.date,
        }
    }

    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => "Uncategorized",
        }
    }
}
