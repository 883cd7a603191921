//! HTTP adapter for the finance API
//!
//! Every response passes through here before reaching presentation code:
//! status codes are checked, bodies decoded, and the dual-shape dashboard
//! payload normalized into a plain `Vec<MonthlyBalance>`.

use crate::error::CoreError;
use crate::import::{SelectedFile, UPLOAD_FIELD, XLSX_MEDIA_TYPE};
use crate::models::{Investment, InvestmentId, MonthlyBalance, Session, Transaction};
use crate::validate::{CategoryUpdate, Credentials, NewInvestment, Registration};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Default API host
pub const DEFAULT_BASE_URL: &str = "http://192.168.1.33:5000";

/// Endpoint paths
pub mod endpoints {
    pub const LOGIN: &str = "/api/login";
    pub const REGISTER: &str = "/api/registro";
    pub const DASHBOARD: &str = "/api/dashboard";
    pub const TRANSACTIONS: &str = "/api/transacoes";
    pub const CATEGORIZE: &str = "/api/categorizar";
    pub const INVESTMENTS: &str = "/api/investimentos";
    pub const SAVE_INVESTMENT: &str = "/api/investimentos/salvar";
    pub const REMOVE_INVESTMENT: &str = "/api/investimentos/remover";
    pub const UPLOAD: &str = "/upload";
}

/// Login response: `{token, nome}` or `{erro}`
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    nome: Option<String>,
}

/// Write endpoint response: `{mensagem}` or `{erro}`
#[derive(Debug, Default, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    mensagem: Option<String>,
}

/// Client for the finance API.
///
/// No request timeout is configured: a hung request stays pending.
#[derive(Debug, Clone)]
pub struct FinanceClient {
    http: Client,
    base_url: String,
}

impl FinanceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CoreError> {
        let http = Client::builder()
            .user_agent(concat!("financer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| CoreError::ClientBuild { source })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "Finance API client created");

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder.header(AUTHORIZATION, session.bearer())
    }

    /// Send a request and return `(status, body)` without judging the status
    async fn send(&self, endpoint: &str, builder: RequestBuilder) -> Result<(u16, String), CoreError> {
        let response = builder.send().await.map_err(|source| {
            warn!(endpoint, error = %source, "Request failed");
            CoreError::Transport {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|source| CoreError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        debug!(endpoint, status, bytes = body.len(), "Response received");
        Ok((status, body))
    }

    /// Send and require a 2xx status
    async fn send_ok(&self, endpoint: &str, builder: RequestBuilder) -> Result<String, CoreError> {
        let (status, body) = self.send(endpoint, builder).await?;
        check_status(endpoint, status, &body)?;
        Ok(body)
    }

    // ===================
    // Authentication
    // ===================

    /// Exchange credentials for a session
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, CoreError> {
        let endpoint = endpoints::LOGIN;
        info!(account = credentials.account_number(), "Logging in");

        let (status, body) = self
            .send(endpoint, self.http.post(self.url(endpoint)).json(credentials))
            .await?;

        // Body is decoded before the status is judged so that `erro` is surfaced
        let value: Value = serde_json::from_str(&body).map_err(|e| CoreError::Decode {
            endpoint: endpoint.to_string(),
            message: "invalid server response".to_string(),
            source: Some(e),
        })?;

        check_status(endpoint, status, &body)?;

        let response: LoginResponse = decode_value(endpoint, value)?;
        match response.token {
            Some(token) if !token.is_empty() => {
                info!("Login succeeded");
                Ok(Session::new(token, response.nome))
            }
            _ => Err(CoreError::MissingToken),
        }
    }

    /// Validate then log in; empty fields never reach the network
    pub async fn login_with(&self, account_number: &str, password: &str) -> Result<Session, CoreError> {
        let credentials = Credentials::new(account_number, password)?;
        self.login(&credentials).await
    }

    /// Create an account, returning the server's confirmation message
    pub async fn register(&self, registration: &Registration) -> Result<Option<String>, CoreError> {
        let endpoint = endpoints::REGISTER;
        let body = self
            .send_ok(endpoint, self.http.post(self.url(endpoint)).json(registration))
            .await?;
        Ok(server_message(&body))
    }

    // ===================
    // Reads
    // ===================

    /// Monthly balances, normalized to a list whatever shape the server used
    pub async fn dashboard(&self, session: &Session) -> Result<Vec<MonthlyBalance>, CoreError> {
        let endpoint = endpoints::DASHBOARD;
        let body = self
            .send_ok(endpoint, self.authed(self.http.get(self.url(endpoint)), session))
            .await?;
        let value: Value = decode(endpoint, &body)?;
        Ok(normalize_dashboard(value))
    }

    pub async fn transactions(&self, session: &Session) -> Result<Vec<Transaction>, CoreError> {
        let endpoint = endpoints::TRANSACTIONS;
        let body = self
            .send_ok(endpoint, self.authed(self.http.get(self.url(endpoint)), session))
            .await?;
        decode(endpoint, &body)
    }

    pub async fn investments(&self, session: &Session) -> Result<Vec<Investment>, CoreError> {
        let endpoint = endpoints::INVESTMENTS;
        let body = self
            .send_ok(endpoint, self.authed(self.http.get(self.url(endpoint)), session))
            .await?;
        decode(endpoint, &body)
    }

    // ===================
    // Writes
    // ===================

    /// Assign a category; propagation to matching transactions is server-side
    pub async fn set_category(
        &self,
        session: &Session,
        update: &CategoryUpdate,
    ) -> Result<Option<String>, CoreError> {
        let endpoint = endpoints::CATEGORIZE;
        info!(
            transaction_id = %update.transaction_id,
            category = %update.category,
            apply_to_all = update.apply_to_all_matching,
            "Categorizing transaction"
        );
        let body = self
            .send_ok(
                endpoint,
                self.authed(self.http.post(self.url(endpoint)), session)
                    .json(update),
            )
            .await?;
        Ok(server_message(&body))
    }

    pub async fn add_investment(
        &self,
        session: &Session,
        investment: &NewInvestment,
    ) -> Result<Option<String>, CoreError> {
        let endpoint = endpoints::SAVE_INVESTMENT;
        info!(ticker = %investment.ticker, "Saving investment");
        let body = self
            .send_ok(
                endpoint,
                self.authed(self.http.post(self.url(endpoint)), session)
                    .json(investment),
            )
            .await?;
        Ok(server_message(&body))
    }

    pub async fn remove_investment(
        &self,
        session: &Session,
        id: InvestmentId,
    ) -> Result<Option<String>, CoreError> {
        let endpoint = endpoints::REMOVE_INVESTMENT;
        info!(id = %id, "Removing investment");
        let url = format!("{}/{}", self.url(endpoint), id);
        let body = self
            .send_ok(endpoint, self.authed(self.http.delete(url), session))
            .await?;
        Ok(server_message(&body))
    }

    /// Upload a statement spreadsheet as the multipart field `extrato`
    pub async fn upload_statement(
        &self,
        session: &Session,
        file: &SelectedFile,
    ) -> Result<(), CoreError> {
        let endpoint = endpoints::UPLOAD;
        let bytes = file.read().await?;
        info!(file = %file.file_name, bytes = bytes.len(), "Uploading statement");

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file.file_name.clone())
            .mime_str(XLSX_MEDIA_TYPE)
            .map_err(|source| CoreError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        self.send_ok(
            endpoint,
            self.authed(self.http.post(self.url(endpoint)), session)
                .multipart(form),
        )
        .await?;
        Ok(())
    }
}

/// Map non-2xx statuses to `CoreError::Status`, keeping the `erro` message
fn check_status(endpoint: &str, status: u16, body: &str) -> Result<(), CoreError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("erro").and_then(Value::as_str).map(str::to_string));
    warn!(endpoint, status, message = message.as_deref().unwrap_or(""), "Server rejected request");
    Err(CoreError::Status {
        endpoint: endpoint.to_string(),
        status,
        message,
    })
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, CoreError> {
    serde_json::from_str(body).map_err(|e| CoreError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
        source: Some(e),
    })
}

fn decode_value<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
        source: Some(e),
    })
}

/// `mensagem` field of a write response, if the body has one
fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<MessageResponse>(body)
        .ok()
        .and_then(|r| r.mensagem)
}

/// Normalize the dashboard payload into an ordered list.
///
/// - array: each object element becomes a record (non-objects are skipped)
/// - object keyed by month: each entry becomes a record whose `month` is the
///   key unless the entry carries its own; server order is kept
/// - anything else: empty
pub fn normalize_dashboard(value: Value) -> Vec<MonthlyBalance> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(month, entry)| {
                let mut balance: MonthlyBalance = if entry.is_object() {
                    serde_json::from_value(entry).unwrap_or_default()
                } else {
                    MonthlyBalance::default()
                };
                if balance.month.is_empty() {
                    balance.month = month;
                }
                balance
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_array_and_object_agree() {
        let array = json!([
            {"mes": "2024-01", "total_credito": 1500, "total_debito": 300, "saldo": 1200},
            {"mes": "2024-02", "total_credito": 200, "total_debito": 50, "saldo": 150}
        ]);
        let object = json!({
            "2024-01": {"total_credito": 1500, "total_debito": 300, "saldo": 1200},
            "2024-02": {"total_credito": 200, "total_debito": 50, "saldo": 150}
        });
        assert_eq!(normalize_dashboard(array), normalize_dashboard(object));
    }

    #[test]
    fn test_normalize_object_keeps_server_order() {
        let object: Value =
            serde_json::from_str(r#"{"2024-03":{"saldo":1},"2023-11":{"saldo":2}}"#).unwrap();
        let months: Vec<_> = normalize_dashboard(object)
            .into_iter()
            .map(|b| b.month)
            .collect();
        assert_eq!(months, vec!["2024-03", "2023-11"]);
    }

    #[test]
    fn test_normalize_entry_month_wins_over_key() {
        let object = json!({"k": {"mes": "2024-05", "saldo": 3}});
        let list = normalize_dashboard(object);
        assert_eq!(list[0].month, "2024-05");
    }

    #[test]
    fn test_normalize_non_object_entry() {
        let object = json!({"2024-01": 42});
        let list = normalize_dashboard(object);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].month, "2024-01");
        assert_eq!(list[0].balance, None);
    }

    #[test]
    fn test_normalize_other_shapes_are_empty() {
        assert!(normalize_dashboard(Value::Null).is_empty());
        assert!(normalize_dashboard(json!("oops")).is_empty());
        assert!(normalize_dashboard(json!([])).is_empty());
    }

    #[test]
    fn test_check_status_extracts_erro() {
        let err = check_status("/api/login", 401, r#"{"erro":"Número ou senha incorretos."}"#)
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Número ou senha incorretos."));
        assert!(check_status("/api/login", 204, "").is_ok());
    }

    #[test]
    fn test_server_message() {
        assert_eq!(
            server_message(r#"{"mensagem":"Transação categorizada!"}"#).as_deref(),
            Some("Transação categorizada!")
        );
        assert_eq!(server_message("not json"), None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = FinanceClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url(endpoints::LOGIN), "http://localhost:5000/api/login");
    }
}
