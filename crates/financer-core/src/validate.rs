//! Client-side request validation
//!
//! Each request type can only be built through its validating constructor, so
//! the API client never sends a request that would be rejected here.

use crate::error::CoreError;
use crate::models::TransactionId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Account number format: seven digits, dash, check digit (e.g. `1234567-8`)
static ACCOUNT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{7}-\d$").expect("static regex"));

pub fn is_valid_account_number(number: &str) -> bool {
    ACCOUNT_NUMBER.is_match(number)
}

/// Parse a user-typed amount. Accepts `1234.5`, `1234,5` and surrounding spaces.
pub fn parse_amount(input: &str) -> Option<f64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn require(field: &'static str, value: &str, reason: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        Err(CoreError::validation(field, reason))
    } else {
        Ok(())
    }
}

/// Login body: `{numero, senha}`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "numero")]
    account_number: String,
    #[serde(rename = "senha")]
    password: String,
}

impl Credentials {
    /// Both fields must be non-empty
    pub fn new(account_number: &str, password: &str) -> Result<Self, CoreError> {
        require(
            "account number",
            account_number,
            "Fill in account number and password",
        )?;
        require("password", password, "Fill in account number and password")?;
        Ok(Self {
            account_number: account_number.to_string(),
            password: password.to_string(),
        })
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }
}

/// Registration body: `{nome, numero, senha}`
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    #[serde(rename = "nome")]
    name: String,
    #[serde(rename = "numero")]
    account_number: String,
    #[serde(rename = "senha")]
    password: String,
}

impl Registration {
    pub fn new(name: &str, account_number: &str, password: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        let account_number = account_number.trim();
        require("name", name, "Fill in all fields")?;
        require("account number", account_number, "Fill in all fields")?;
        require("password", password, "Fill in all fields")?;
        if !is_valid_account_number(account_number) {
            return Err(CoreError::validation(
                "account number",
                "Invalid account number. Use 1234567-8",
            ));
        }
        Ok(Self {
            name: name.to_string(),
            account_number: account_number.to_string(),
            password: password.to_string(),
        })
    }
}

/// Categorize body: `{transacao_id, categoria, aplicar_todas}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryUpdate {
    #[serde(rename = "transacao_id")]
    pub transaction_id: TransactionId,
    #[serde(rename = "categoria")]
    pub category: String,
    /// Ask the server to propagate to every matching transaction
    #[serde(rename = "aplicar_todas")]
    pub apply_to_all_matching: bool,
}

impl CategoryUpdate {
    pub fn new(
        transaction_id: TransactionId,
        category: &str,
        apply_to_all_matching: bool,
    ) -> Result<Self, CoreError> {
        let category = category.trim();
        require("category", category, "Choose a category first")?;
        Ok(Self {
            transaction_id,
            category: category.to_string(),
            apply_to_all_matching,
        })
    }
}

/// New investment body: `{papel, saldo, descricao}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInvestment {
    #[serde(rename = "papel")]
    pub ticker: String,
    #[serde(rename = "saldo")]
    pub balance: f64,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewInvestment {
    /// Ticker required, balance must parse as a number, description optional
    pub fn parse(ticker: &str, balance: &str, description: &str) -> Result<Self, CoreError> {
        let ticker = ticker.trim();
        require("ticker", ticker, "Fill in the required fields")?;
        require("balance", balance.trim(), "Fill in the required fields")?;
        let balance = parse_amount(balance)
            .ok_or_else(|| CoreError::validation("balance", "Balance must be a number"))?;
        let description = Some(description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Self {
            ticker: ticker.to_string(),
            balance,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_both_fields() {
        assert!(Credentials::new("", "x").is_err());
        assert!(Credentials::new("x", "").is_err());
        let ok = Credentials::new("1234567-8", "secret").unwrap();
        assert_eq!(ok.account_number(), "1234567-8");
    }

    #[test]
    fn test_credentials_body() {
        let c = Credentials::new("1234567-8", "pw").unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json, serde_json::json!({"numero": "1234567-8", "senha": "pw"}));
    }

    #[test]
    fn test_account_number_format() {
        assert!(is_valid_account_number("1234567-8"));
        assert!(!is_valid_account_number("12345678"));
        assert!(!is_valid_account_number("1234567-89"));
        assert!(!is_valid_account_number("123456-78"));
    }

    #[test]
    fn test_registration_validation() {
        assert!(Registration::new("Ana", "1234567-8", "pw").is_ok());
        let err = Registration::new("Ana", "12345678", "pw").unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "account number", .. }));
        assert!(Registration::new(" ", "1234567-8", "pw").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1500"), Some(1500.0));
        assert_eq!(parse_amount(" 12,5 "), Some(12.5));
        assert_eq!(parse_amount("-3.25"), Some(-3.25));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_new_investment_rejects_non_numeric_balance() {
        let err = NewInvestment::parse("PETR4", "lots", "").unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "balance", .. }));
        assert!(NewInvestment::parse("", "10", "").is_err());
        assert!(NewInvestment::parse("PETR4", "  ", "").is_err());
    }

    #[test]
    fn test_new_investment_optional_description() {
        let inv = NewInvestment::parse(" PETR4 ", "1500,75", "  ").unwrap();
        assert_eq!(inv.ticker, "PETR4");
        assert_eq!(inv.balance, 1500.75);
        assert_eq!(inv.description, None);
        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(json, serde_json::json!({"papel": "PETR4", "saldo": 1500.75}));
    }

    #[test]
    fn test_category_update_body() {
        let update = CategoryUpdate::new(TransactionId(9), "Lazer", true).unwrap();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"transacao_id": 9, "categoria": "Lazer", "aplicar_todas": true})
        );
        assert!(CategoryUpdate::new(TransactionId(9), " ", false).is_err());
    }
}
