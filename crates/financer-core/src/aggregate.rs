//! Client-side aggregation over fetched lists
//!
//! Pure functions: nothing here mutates its input or touches the network.

use crate::models::{MonthlyBalance, Transaction};
use std::collections::HashSet;
use std::fmt;

/// Sum of every month's balance, missing or non-numeric balances count as zero
pub fn grand_total(balances: &[MonthlyBalance]) -> f64 {
    balances.iter().map(MonthlyBalance::balance_or_zero).sum()
}

/// Month filter option for the transaction list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum MonthFilter {
    #[default]
    All,
    /// Year-month prefix, e.g. `2024-01`
    Month(String),
}

impl MonthFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(prefix) => transaction.date.starts_with(prefix.as_str()),
        }
    }

    /// Parse a user-supplied filter; `all` (any case) or empty means no filter
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            MonthFilter::All
        } else {
            MonthFilter::Month(trimmed.to_string())
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => write!(f, "all"),
            MonthFilter::Month(prefix) => write!(f, "{}", prefix),
        }
    }
}

/// Filter options: `All` followed by each distinct month prefix, in order of
/// first occurrence
pub fn month_filters(transactions: &[Transaction]) -> Vec<MonthFilter> {
    let mut seen = HashSet::new();
    let mut filters = vec![MonthFilter::All];

    for t in transactions {
        let prefix = t.month_prefix();
        if seen.insert(prefix) {
            filters.push(MonthFilter::Month(prefix.to_string()));
        }
    }

    filters
}

/// Transactions matching `filter`, original order preserved
pub fn filter_by_month<'a>(
    transactions: &'a [Transaction],
    filter: &MonthFilter,
) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| filter.matches(t)).collect()
}

/// Keep `current` if still offered, otherwise fall back to `All`
pub fn reconcile_filter(current: &MonthFilter, options: &[MonthFilter]) -> MonthFilter {
    if options.contains(current) {
        current.clone()
    } else {
        MonthFilter::All
    }
}

// ============================================================================
// MEI revenue limit
// ============================================================================

/// Annual gross revenue limit for a MEI (individual micro-entrepreneur)
pub const MEI_ANNUAL_LIMIT: f64 = 81_000.0;

/// Above this the MEI registration is cancelled retroactively (limit + 20%)
pub const MEI_EXCESS_LIMIT: f64 = MEI_ANNUAL_LIMIT * 1.20;

/// Revenue alert for the MEI annual limit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeiAlert {
    /// At least 75% of the limit
    Approaching { percent: f64 },
    /// At least 90% of the limit
    Critical { percent: f64 },
    /// Above the limit but within the 20% tolerance
    Exceeded,
    /// Above the 20% tolerance
    ExceededRetroactive,
}

impl MeiAlert {
    pub fn is_critical(&self) -> bool {
        !matches!(self, MeiAlert::Approaching { .. })
    }

    pub fn message(&self) -> String {
        match self {
            MeiAlert::Approaching { percent } => {
                format!("You reached {:.1}% of the annual MEI limit.", percent)
            }
            MeiAlert::Critical { percent } => {
                format!("Attention! You reached {:.1}% of the annual MEI limit!", percent)
            }
            MeiAlert::Exceeded => format!(
                "You exceeded the MEI limit (R$ {:.0}). Consider changing regime next year.",
                MEI_ANNUAL_LIMIT
            ),
            MeiAlert::ExceededRetroactive => format!(
                "You exceeded R$ {:.0}. Retroactive MEI disqualification is mandatory.",
                MEI_EXCESS_LIMIT
            ),
        }
    }
}

/// Classify an annual revenue total against the MEI limit
pub fn mei_alert(annual_revenue: f64) -> Option<MeiAlert> {
    let percent = annual_revenue / MEI_ANNUAL_LIMIT * 100.0;

    if annual_revenue > MEI_EXCESS_LIMIT {
        Some(MeiAlert::ExceededRetroactive)
    } else if annual_revenue > MEI_ANNUAL_LIMIT {
        Some(MeiAlert::Exceeded)
    } else if percent >= 90.0 {
        Some(MeiAlert::Critical { percent })
    } else if percent >= 75.0 {
        Some(MeiAlert::Approaching { percent })
    } else {
        None
    }
}

/// Most recent year present in the balances
pub fn latest_year(balances: &[MonthlyBalance]) -> Option<i32> {
    balances.iter().filter_map(MonthlyBalance::year).max()
}

/// Total credit of every month belonging to `year`
pub fn yearly_credit(balances: &[MonthlyBalance], year: i32) -> f64 {
    balances
        .iter()
        .filter(|b| b.year() == Some(year))
        .map(MonthlyBalance::credit_or_zero)
        .sum()
}

/// MEI alert for the most recent year of the dashboard, if any
pub fn dashboard_mei_alert(balances: &[MonthlyBalance]) -> Option<(i32, MeiAlert)> {
    let year = latest_year(balances)?;
    mei_alert(yearly_credit(balances, year)).map(|alert| (year, alert))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionId;

    fn tx(id: i64, date: &str) -> Transaction {
        Transaction {
            id: TransactionId(id),
            date: date.to_string(),
            kind: "Pix".into(),
            detail: format!("detail {}", id),
            credit: 10.0,
            debit: 0.0,
            category: None,
        }
    }

    fn balance(value: Option<f64>) -> MonthlyBalance {
        MonthlyBalance {
            month: "2024-01".into(),
            total_credit: None,
            total_debit: None,
            balance: value,
        }
    }

    #[test]
    fn test_grand_total_treats_missing_as_zero() {
        let balances = vec![balance(Some(100.0)), balance(Some(-30.0)), balance(None)];
        assert_eq!(grand_total(&balances), 70.0);
    }

    #[test]
    fn test_grand_total_from_junk_json() {
        let balances: Vec<MonthlyBalance> =
            serde_json::from_str(r#"[{"saldo":100},{"saldo":-30},{"saldo":"x"},{}]"#).unwrap();
        assert_eq!(grand_total(&balances), 70.0);
    }

    #[test]
    fn test_grand_total_empty() {
        assert_eq!(grand_total(&[]), 0.0);
    }

    #[test]
    fn test_month_filters_first_occurrence_order() {
        let list = vec![
            tx(1, "2024-02-01"),
            tx(2, "2024-01-15"),
            tx(3, "2024-02-20"),
            tx(4, "2023-12-31"),
        ];
        let filters = month_filters(&list);
        assert_eq!(
            filters,
            vec![
                MonthFilter::All,
                MonthFilter::Month("2024-02".into()),
                MonthFilter::Month("2024-01".into()),
                MonthFilter::Month("2023-12".into()),
            ]
        );
    }

    #[test]
    fn test_month_filters_empty_list() {
        assert_eq!(month_filters(&[]), vec![MonthFilter::All]);
    }

    #[test]
    fn test_filter_all_returns_everything() {
        let list = vec![tx(1, "2024-02-01"), tx(2, "2024-01-15")];
        let filtered = filter_by_month(&list, &MonthFilter::All);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].id, TransactionId(1));
        assert_eq!(filtered[1].id, TransactionId(2));
    }

    #[test]
    fn test_filter_prefix_preserves_order() {
        let list = vec![
            tx(1, "2024-02-01"),
            tx(2, "2024-01-15"),
            tx(3, "2024-02-20"),
        ];
        let filtered = filter_by_month(&list, &MonthFilter::Month("2024-02".into()));
        let ids: Vec<_> = filtered.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
        // input untouched
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_reconcile_filter_falls_back_to_all() {
        let options = vec![MonthFilter::All, MonthFilter::Month("2024-01".into())];
        let gone = MonthFilter::Month("2023-05".into());
        assert_eq!(reconcile_filter(&gone, &options), MonthFilter::All);
        let kept = MonthFilter::Month("2024-01".into());
        assert_eq!(reconcile_filter(&kept, &options), kept);
    }

    #[test]
    fn test_month_filter_parse() {
        assert_eq!(MonthFilter::parse("ALL"), MonthFilter::All);
        assert_eq!(MonthFilter::parse(""), MonthFilter::All);
        assert_eq!(
            MonthFilter::parse(" 2024-01 "),
            MonthFilter::Month("2024-01".into())
        );
        assert_eq!(MonthFilter::Month("2024-01".into()).to_string(), "2024-01");
    }

    #[test]
    fn test_mei_alert_thresholds() {
        assert_eq!(mei_alert(50_000.0), None);
        assert!(matches!(
            mei_alert(61_000.0),
            Some(MeiAlert::Approaching { percent }) if (percent - 75.308).abs() < 0.01
        ));
        assert!(matches!(mei_alert(73_000.0), Some(MeiAlert::Critical { .. })));
        assert_eq!(mei_alert(81_000.0).map(|a| a.is_critical()), Some(true));
        assert_eq!(mei_alert(85_000.0), Some(MeiAlert::Exceeded));
        assert_eq!(mei_alert(97_200.0), Some(MeiAlert::Exceeded));
        assert_eq!(mei_alert(97_200.01), Some(MeiAlert::ExceededRetroactive));
    }

    #[test]
    fn test_dashboard_mei_alert_uses_latest_year() {
        let balances = vec![
            MonthlyBalance::new("2023-06", 90_000.0, 0.0, 90_000.0),
            MonthlyBalance::new("2024-01", 40_000.0, 0.0, 40_000.0),
            MonthlyBalance::new("2024-02", 30_000.0, 0.0, 30_000.0),
        ];
        assert_eq!(latest_year(&balances), Some(2024));
        assert_eq!(yearly_credit(&balances, 2024), 70_000.0);
        let (year, alert) = dashboard_mei_alert(&balances).unwrap();
        assert_eq!(year, 2024);
        // 2023 alone would be Exceeded
        assert!(matches!(
            alert,
            MeiAlert::Approaching { percent } if (percent - 86.419).abs() < 0.01
        ));
    }
}
