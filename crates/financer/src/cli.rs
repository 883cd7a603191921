//! CLI output and lookups for the non-interactive commands
//!
//! Formatters render either a comfy-table (human) or pretty JSON.

use financer_core::aggregate::{dashboard_mei_alert, filter_by_month, grand_total, month_filters};
use financer_core::models::amount::format_currency;
use financer_core::{
    CoreError, Investment, InvestmentId, MonthFilter, MonthlyBalance, Transaction,
};
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use serde::Serialize;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum CliError {
    MissingCredentials,
    InvalidMonth {
        input: String,
    },
    NotFound {
        what: &'static str,
        id: i64,
    },
    Core(CoreError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::MissingCredentials => write!(
                f,
                "This command needs --account and --password (or FINANCER_ACCOUNT / FINANCER_PASSWORD)"
            ),
            CliError::InvalidMonth { input } => write!(
                f,
                "Invalid month '{}' (expected YYYY-MM or a value listed by `financer months`)",
                input
            ),
            CliError::NotFound { what, id } => write!(f, "No {} with id {}", what, id),
            CliError::Core(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Core(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(e: CoreError) -> Self {
        CliError::Core(e)
    }
}

// ============================================================================
// Lookups
// ============================================================================

const MONTH_PREFIX_LEN: usize = 7;

/// Parse a `--month` argument: `all` or any option `months` can list
///
/// Options are date prefixes of at most seven characters (`YYYY-MM`, or the
/// whole date when the server sends a shorter one), so longer input is rejected.
pub fn parse_month(input: Option<&str>) -> Result<MonthFilter, CliError> {
    let Some(input) = input else {
        return Ok(MonthFilter::All);
    };
    let filter = MonthFilter::parse(input);
    match &filter {
        MonthFilter::Month(prefix) if prefix.chars().count() > MONTH_PREFIX_LEN => {
            Err(CliError::InvalidMonth {
                input: input.to_string(),
            })
        }
        _ => Ok(filter),
    }
}

/// Ensure an investment id is present in the ledger
pub fn find_investment(investments: &[Investment], id: i64) -> Result<&Investment, CliError> {
    investments
        .iter()
        .find(|inv| inv.id == InvestmentId(id))
        .ok_or(CliError::NotFound {
            what: "investment",
            id,
        })
}

// ============================================================================
// Formatters
// ============================================================================

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

fn header(table: &mut Table, columns: &[&str], no_color: bool) {
    if no_color {
        table.set_header(columns.to_vec());
    } else {
        table.set_header(
            columns
                .iter()
                .map(|c| Cell::new(c).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Monthly balances with grand total and the MEI line
pub fn format_dashboard(balances: &[MonthlyBalance], json: bool, no_color: bool) -> String {
    if json {
        return to_json(&serde_json::json!({
            "balances": balances,
            "grandTotal": grand_total(balances),
        }));
    }

    if balances.is_empty() {
        return "No data.".to_string();
    }

    let mut table = new_table();
    header(&mut table, &["Month", "Credit", "Debit", "Balance"], no_color);
    for b in balances {
        table.add_row(Row::from(vec![
            b.display_month(),
            format_currency(b.credit_or_zero()),
            format_currency(b.debit_or_zero()),
            format_currency(b.balance_or_zero()),
        ]));
    }

    let mut lines = vec![
        table.to_string(),
        format!("Total balance: {}", format_currency(grand_total(balances))),
    ];
    if let Some((year, alert)) = dashboard_mei_alert(balances) {
        lines.push(format!("MEI {}: {}", year, alert.message()));
    }
    lines.join("\n")
}

/// Transactions visible under `filter`
pub fn format_transactions(
    transactions: &[Transaction],
    filter: &MonthFilter,
    json: bool,
    no_color: bool,
) -> String {
    let visible = filter_by_month(transactions, filter);
    if json {
        return to_json(&visible);
    }

    if visible.is_empty() {
        return match filter {
            MonthFilter::All => "No transactions.".to_string(),
            MonthFilter::Month(m) => format!("No transactions in {}.", m),
        };
    }

    let mut table = new_table();
    header(
        &mut table,
        &["ID", "Date", "Type", "Detail", "Credit", "Debit", "Category"],
        no_color,
    );
    for t in &visible {
        table.add_row(Row::from(vec![
            t.id.to_string(),
            t.date.clone(),
            t.kind.clone(),
            t.detail.clone(),
            positive_amount(t.credit),
            positive_amount(t.debit),
            t.category_label().to_string(),
        ]));
    }
    table.to_string()
}

/// Month filter options, one per line
pub fn format_months(transactions: &[Transaction]) -> String {
    month_filters(transactions)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Investment ledger with portfolio total
pub fn format_investments(investments: &[Investment], json: bool, no_color: bool) -> String {
    if json {
        return to_json(investments);
    }

    if investments.is_empty() {
        return "No investments.".to_string();
    }

    let mut table = new_table();
    header(&mut table, &["ID", "Ticker", "Description", "Balance"], no_color);
    for inv in investments {
        table.add_row(Row::from(vec![
            inv.id.to_string(),
            inv.ticker.clone(),
            inv.display_name().to_string(),
            format_currency(inv.balance),
        ]));
    }

    let total = financer_core::models::investment::portfolio_total(investments);
    format!("{}\nPortfolio total: {}", table, format_currency(total))
}

fn positive_amount(value: f64) -> String {
    if value > 0.0 {
        format!("{:.2}", value)
    } else {
        String::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
