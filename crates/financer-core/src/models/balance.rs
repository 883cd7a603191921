//! Monthly balance aggregates produced by the dashboard endpoint

use super::amount;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Server-computed monthly credit/debit/balance summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    /// Month label, normally `YYYY-MM`
    #[serde(rename = "mes", default)]
    pub month: String,

    #[serde(rename = "total_credito", default, deserialize_with = "amount::lenient")]
    pub total_credit: Option<f64>,

    #[serde(rename = "total_debito", default, deserialize_with = "amount::lenient")]
    pub total_debit: Option<f64>,

    #[serde(rename = "saldo", default, deserialize_with = "amount::lenient")]
    pub balance: Option<f64>,
}

impl MonthlyBalance {
    pub fn new(month: impl Into<String>, credit: f64, debit: f64, balance: f64) -> Self {
        Self {
            month: month.into(),
            total_credit: Some(credit),
            total_debit: Some(debit),
            balance: Some(balance),
        }
    }

    pub fn credit_or_zero(&self) -> f64 {
        self.total_credit.unwrap_or(0.0)
    }

    pub fn debit_or_zero(&self) -> f64 {
        self.total_debit.unwrap_or(0.0)
    }

    pub fn balance_or_zero(&self) -> f64 {
        self.balance.unwrap_or(0.0)
    }

    /// First day of the month, when the label is `YYYY-MM`-shaped
    pub fn period(&self) -> Option<NaiveDate> {
        let prefix = self.month.get(..7)?;
        NaiveDate::parse_from_str(&format!("{}-01", prefix), "%Y-%m-%d").ok()
    }

    pub fn year(&self) -> Option<i32> {
        self.period().map(|d| d.year())
    }

    /// Label for display, e.g. `Jan 2024`; raw label otherwise
    pub fn display_month(&self) -> String {
        match self.period() {
            Some(d) => d.format("%b %Y").to_string(),
            None if self.month.is_empty() => "Month".to_string(),
            None => self.month.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{"mes":"2024-01","total_credito":1500.0,"total_debito":300,"saldo":1200}"#;
        let b: MonthlyBalance = serde_json::from_str(json).unwrap();
        assert_eq!(b.month, "2024-01");
        assert_eq!(b.total_credit, Some(1500.0));
        assert_eq!(b.total_debit, Some(300.0));
        assert_eq!(b.balance, Some(1200.0));
    }

    #[test]
    fn test_missing_and_junk_fields() {
        let b: MonthlyBalance = serde_json::from_str(r#"{"saldo":"n/a"}"#).unwrap();
        assert_eq!(b.month, "");
        assert_eq!(b.balance, None);
        assert_eq!(b.balance_or_zero(), 0.0);
        assert_eq!(b.display_month(), "Month");
    }

    #[test]
    fn test_period_and_year() {
        let b = MonthlyBalance::new("2024-02", 0.0, 0.0, 0.0);
        assert_eq!(b.year(), Some(2024));
        assert_eq!(b.display_month(), "Feb 2024");

        let odd = MonthlyBalance::new("fevereiro", 0.0, 0.0, 0.0);
        assert_eq!(odd.year(), None);
        assert_eq!(odd.display_month(), "fevereiro");
    }
}
