//! Screen flows: fetch → collapse, write → alert → re-fetch
//!
//! These wrap the API client with the per-screen error policy. Read failures
//! collapse to an empty list (logged, not surfaced). Write failures become an
//! error alert, and the list is re-fetched whatever the write outcome was, so
//! a failed write can look like stale data.

use crate::api::FinanceClient;
use crate::error::{Alert, CoreError};
use crate::import::SelectedFile;
use crate::models::{Investment, InvestmentId, MonthlyBalance, Session, Transaction};
use crate::validate::{CategoryUpdate, NewInvestment};
use tracing::{info, warn};

/// Result of a write followed by a list re-fetch
#[derive(Debug, Clone)]
pub struct WriteOutcome<T> {
    pub alert: Alert,
    /// Whether the write itself succeeded
    pub succeeded: bool,
    pub refreshed: Vec<T>,
}

fn collapse<T>(what: &str, result: Result<Vec<T>, CoreError>) -> Vec<T> {
    match result {
        Ok(list) => {
            info!(what, count = list.len(), "Loaded");
            list
        }
        Err(e) => {
            warn!(what, error = %e, kind = ?e.kind(), "Load failed, showing empty list");
            Vec::new()
        }
    }
}

fn write_alert(
    title: &str,
    fallback_ok: &str,
    fallback_err: &str,
    result: &Result<Option<String>, CoreError>,
) -> Alert {
    match result {
        Ok(message) => Alert::success(
            title,
            message.clone().unwrap_or_else(|| fallback_ok.to_string()),
        ),
        Err(e) => {
            warn!(title, error = %e, "Write failed");
            Alert::from_core_error(title, fallback_err, e)
        }
    }
}

pub async fn fetch_dashboard(client: &FinanceClient, session: &Session) -> Vec<MonthlyBalance> {
    collapse("dashboard", client.dashboard(session).await)
}

pub async fn fetch_transactions(client: &FinanceClient, session: &Session) -> Vec<Transaction> {
    collapse("transactions", client.transactions(session).await)
}

pub async fn fetch_investments(client: &FinanceClient, session: &Session) -> Vec<Investment> {
    collapse("investments", client.investments(session).await)
}

/// Categorize, then re-fetch the full transaction list
pub async fn categorize(
    client: &FinanceClient,
    session: &Session,
    update: &CategoryUpdate,
) -> WriteOutcome<Transaction> {
    let result = client.set_category(session, update).await;
    let succeeded = result.is_ok();
    let alert = write_alert(
        "Categorize",
        "Transaction categorized",
        "Failed to save category",
        &result,
    );
    let refreshed = fetch_transactions(client, session).await;
    WriteOutcome {
        alert,
        succeeded,
        refreshed,
    }
}

/// Save an investment, then re-fetch the ledger
pub async fn add_investment(
    client: &FinanceClient,
    session: &Session,
    investment: &NewInvestment,
) -> WriteOutcome<Investment> {
    let result = client.add_investment(session, investment).await;
    let succeeded = result.is_ok();
    let alert = write_alert(
        "Investments",
        "Investment saved",
        "Failed to save investment",
        &result,
    );
    let refreshed = fetch_investments(client, session).await;
    WriteOutcome {
        alert,
        succeeded,
        refreshed,
    }
}

/// Remove an investment (no confirmation), then re-fetch the ledger
pub async fn remove_investment(
    client: &FinanceClient,
    session: &Session,
    id: InvestmentId,
) -> WriteOutcome<Investment> {
    let result = client.remove_investment(session, id).await;
    let succeeded = result.is_ok();
    let alert = write_alert(
        "Investments",
        "Investment removed",
        "Failed to remove investment",
        &result,
    );
    let refreshed = fetch_investments(client, session).await;
    WriteOutcome {
        alert,
        succeeded,
        refreshed,
    }
}

/// Upload a statement. Only HTTP-level success is reported.
pub async fn upload_statement(
    client: &FinanceClient,
    session: &Session,
    file: &SelectedFile,
) -> (bool, Alert) {
    match client.upload_statement(session, file).await {
        Ok(()) => (
            true,
            Alert::success("Import", "Statement imported successfully!"),
        ),
        Err(e) => {
            warn!(file = %file.file_name, error = %e, "Upload failed");
            let fallback = match e {
                CoreError::Status { .. } => "Failed to send the file",
                _ => "Error sending the file",
            };
            (false, Alert::from_core_error("Import", fallback, &e))
        }
    }
}

/// User-facing alert for a failed login
pub fn login_failure_alert(error: &CoreError) -> Alert {
    let fallback = match error {
        CoreError::Decode { .. } => "Invalid server response",
        CoreError::MissingToken => "Token not received",
        CoreError::Transport { .. } | CoreError::ClientBuild { .. } => {
            "Could not connect to the API"
        }
        _ => "Login failed",
    };
    Alert::from_core_error("Login", fallback, error)
}
