//! Investment ledger entries

use super::amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for investment IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestmentId(pub i64);

impl fmt::Display for InvestmentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for InvestmentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Position in the investment ledger. Created or removed, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: InvestmentId,

    #[serde(rename = "papel", default)]
    pub ticker: String,

    #[serde(rename = "saldo", default, deserialize_with = "amount::lenient_or_zero")]
    pub balance: f64,

    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
}

impl Investment {
    /// Description when present, ticker otherwise
    pub fn display_name(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => &self.ticker,
        }
    }
}

/// Sum of all ledger balances
pub fn portfolio_total(investments: &[Investment]) -> f64 {
    investments.iter().map(|i| i.balance).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let json = r#"[{"id":1,"papel":"PETR4","saldo":"1500.5","descricao":""},
                       {"id":2,"papel":"VALE3","saldo":200,"descricao":"Mining"}]"#;
        let items: Vec<Investment> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0].display_name(), "PETR4");
        assert_eq!(items[0].balance, 1500.5);
        assert_eq!(items[1].display_name(), "Mining");
        assert_eq!(portfolio_total(&items), 1700.5);
    }
}
