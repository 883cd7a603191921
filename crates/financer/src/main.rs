//! financer - personal finance client (TUI + CLI)

mod cli;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cli::CliError;
use financer_core::config::{self, FinancerConfig};
use financer_core::{
    flows, Alert, CategoryUpdate, Credentials, FinanceClient, NewInvestment, Registration,
    SelectedFile, Session, TransactionId,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FINANCER_LOG";
const LOG_FILE: &str = "financer.log";

#[derive(Parser)]
#[command(
    name = "financer",
    version,
    about = "Personal finance client: balances, transactions, investments, statement import",
    long_about = "Terminal client for the financer API.\n\
                  \n\
                  Runs the interactive TUI by default. The other commands log in once per\n\
                  invocation and print tables (or JSON with --json).\n\
                  \n\
                  Examples:\n\
                    financer                                   # Run TUI (default)\n\
                    financer dashboard                         # Monthly balances + total\n\
                    financer transactions --month 2024-03      # One month of statement lines\n\
                    financer categorize 42 Lazer --all         # Categorize every matching line\n\
                    financer investments add PETR4 1500.00     # Add a ledger entry\n\
                    financer import ~/extrato.xlsx             # Upload a bank statement\n\
                  \n\
                  Environment Variables:\n\
                    FINANCER_BASE_URL                          # API base URL\n\
                    FINANCER_ACCOUNT / FINANCER_PASSWORD       # Credentials for CLI commands\n\
                    FINANCER_NO_COLOR                          # Disable ANSI colors\n\
                    FINANCER_LOG                               # Log filter (e.g. debug)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// API base URL (overrides the config file)
    #[arg(long, global = true, env = "FINANCER_BASE_URL")]
    base_url: Option<String>,

    /// Config file (default: <config dir>/financer/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, global = true, env = "FINANCER_NO_COLOR")]
    no_color: bool,

    /// Account number, format 1234567-8
    #[arg(long, global = true, env = "FINANCER_ACCOUNT")]
    account: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "FINANCER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Mode {
    /// Run TUI interface (default)
    Tui,
    /// Create an account
    Register {
        /// Account holder name
        #[arg(long)]
        name: String,
    },
    /// Print monthly balances, grand total and MEI alert
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print statement transactions
    Transactions {
        /// Month filter: YYYY-MM, "all", or any value listed by `months`
        #[arg(long, short = 'm')]
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the month filter options
    Months,
    /// Set the category of a transaction
    Categorize {
        /// Transaction id
        id: i64,
        /// Category name
        category: String,
        /// Also apply to every transaction with the same detail
        #[arg(long)]
        all: bool,
    },
    /// Manage the investment ledger
    Investments {
        #[command(subcommand)]
        action: InvestmentAction,
    },
    /// Upload a .xlsx bank statement
    Import {
        /// Path to the spreadsheet
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum InvestmentAction {
    /// Print the ledger
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an entry
    Add {
        /// Ticker, e.g. PETR4
        ticker: String,
        /// Balance; comma or dot decimals
        balance: String,
        /// Optional description
        #[arg(long, short = 'd')]
        description: Option<String>,
    },
    /// Remove an entry by id
    Remove {
        /// Investment id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mode = cli.mode.unwrap_or(Mode::Tui);

    init_logging(matches!(mode, Mode::Tui));

    let config = resolve_config(cli.config.as_deref(), cli.base_url);
    debug!(base_url = %config.base_url, "Config loaded");

    let client = FinanceClient::new(config.base_url.clone())
        .context("Failed to create HTTP client")?;
    let auth = Auth {
        account: cli.account,
        password: cli.password,
    };
    let no_color = cli.no_color;

    match mode {
        Mode::Tui => financer_tui::run(config).await,
        Mode::Register { name } => run_register(&client, &auth, &name).await,
        Mode::Dashboard { json } => {
            let session = auth.login(&client).await?;
            let balances = with_spinner("Loading dashboard...", client.dashboard(&session)).await?;
            println!("{}", cli::format_dashboard(&balances, json, no_color));
            Ok(())
        }
        Mode::Transactions { month, json } => {
            let filter = cli::parse_month(month.as_deref())?;
            let session = auth.login(&client).await?;
            let list =
                with_spinner("Loading transactions...", client.transactions(&session)).await?;
            println!("{}", cli::format_transactions(&list, &filter, json, no_color));
            Ok(())
        }
        Mode::Months => {
            let session = auth.login(&client).await?;
            let list =
                with_spinner("Loading transactions...", client.transactions(&session)).await?;
            println!("{}", cli::format_months(&list));
            Ok(())
        }
        Mode::Categorize { id, category, all } => {
            let update = CategoryUpdate::new(TransactionId(id), &category, all)?;
            let session = auth.login(&client).await?;
            let outcome =
                with_spinner("Saving category...", flows::categorize(&client, &session, &update))
                    .await;
            report(&outcome.alert);
            println!("{} transactions after refresh", outcome.refreshed.len());
            finish(outcome.succeeded)
        }
        Mode::Investments { action } => run_investments(&client, &auth, action, no_color).await,
        Mode::Import { file } => {
            let file = SelectedFile::from_path(&file)?;
            let session = auth.login(&client).await?;
            let (succeeded, alert) = with_spinner(
                "Sending statement...",
                flows::upload_statement(&client, &session, &file),
            )
            .await;
            report(&alert);
            finish(succeeded)
        }
    }
}

/// Credentials taken from flags or environment
struct Auth {
    account: Option<String>,
    password: Option<String>,
}

impl Auth {
    fn pair(&self) -> Result<(&str, &str), CliError> {
        match (self.account.as_deref(), self.password.as_deref()) {
            (Some(account), Some(password)) => Ok((account, password)),
            _ => Err(CliError::MissingCredentials),
        }
    }

    /// Log in for this invocation only; the token is never persisted
    async fn login(&self, client: &FinanceClient) -> Result<Session> {
        let (account, password) = self.pair()?;
        let credentials = Credentials::new(account, password)?;
        let session = with_spinner("Signing in...", client.login(&credentials))
            .await
            .map_err(|e| anyhow::anyhow!("{}", flows::login_failure_alert(&e)))?;
        info!(holder = session.display_name(), "Logged in");
        Ok(session)
    }
}

async fn run_register(client: &FinanceClient, auth: &Auth, name: &str) -> Result<()> {
    let (account, password) = auth.pair()?;
    let registration = Registration::new(name, account, password)?;
    match with_spinner("Creating account...", client.register(&registration)).await {
        Ok(message) => {
            report(&Alert::success(
                "Register",
                message.unwrap_or_else(|| "Account created".to_string()),
            ));
            Ok(())
        }
        Err(e) => {
            report(&Alert::from_core_error("Register", "Could not create the account", &e));
            finish(false)
        }
    }
}

async fn run_investments(
    client: &FinanceClient,
    auth: &Auth,
    action: InvestmentAction,
    no_color: bool,
) -> Result<()> {
    match action {
        InvestmentAction::List { json } => {
            let session = auth.login(client).await?;
            let ledger = with_spinner("Loading investments...", client.investments(&session)).await?;
            println!("{}", cli::format_investments(&ledger, json, no_color));
            Ok(())
        }
        InvestmentAction::Add {
            ticker,
            balance,
            description,
        } => {
            let investment =
                NewInvestment::parse(&ticker, &balance, description.as_deref().unwrap_or(""))?;
            let session = auth.login(client).await?;
            let outcome = with_spinner(
                "Saving investment...",
                flows::add_investment(client, &session, &investment),
            )
            .await;
            report(&outcome.alert);
            println!("{}", cli::format_investments(&outcome.refreshed, false, no_color));
            finish(outcome.succeeded)
        }
        InvestmentAction::Remove { id } => {
            let session = auth.login(client).await?;
            let ledger = client.investments(&session).await?;
            let target = cli::find_investment(&ledger, id)?.id;
            let outcome = with_spinner(
                "Removing investment...",
                flows::remove_investment(client, &session, target),
            )
            .await;
            report(&outcome.alert);
            println!("{}", cli::format_investments(&outcome.refreshed, false, no_color));
            finish(outcome.succeeded)
        }
    }
}

/// Print an alert: errors and warnings to stderr, the rest to stdout
fn report(alert: &Alert) {
    if alert.is_error() || alert.severity == financer_core::Severity::Warning {
        eprintln!("{}", alert);
    } else {
        println!("{}", alert);
    }
}

/// Non-zero exit for a failed write
fn finish(succeeded: bool) -> Result<()> {
    if succeeded {
        Ok(())
    } else {
        bail!("Request failed")
    }
}

/// Await `future` behind a stderr spinner (hidden when stderr is not a terminal)
async fn with_spinner<F: Future>(message: &'static str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let output = future.await;
    spinner.finish_and_clear();
    output
}

/// Config file (explicit path or default location), then the base-URL override
fn resolve_config(path: Option<&Path>, base_url: Option<String>) -> FinancerConfig {
    match path {
        Some(path) => FinancerConfig::load(path),
        None => FinancerConfig::load_default(),
    }
    .with_base_url(base_url)
}

/// TUI logs go to a file so they never draw over the screen; CLI logs go to stderr
fn init_logging(to_file: bool) {
    if to_file {
        let dir = config::data_dir();
        let file = std::fs::create_dir_all(&dir).and_then(|_| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE))
        });
        // Without a log file the TUI runs silent
        if let Ok(file) = file {
            let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        return;
    }

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tui_is_default_mode() {
        let cli = Cli::try_parse_from(["financer"]).unwrap();
        assert!(cli.mode.is_none());
    }

    #[test]
    fn test_global_credentials_after_subcommand() {
        let cli = Cli::try_parse_from([
            "financer",
            "register",
            "--name",
            "Ana",
            "--account",
            "1234567-8",
            "--password",
            "pw",
        ])
        .unwrap();
        assert!(matches!(cli.mode, Some(Mode::Register { ref name }) if name == "Ana"));
        assert_eq!(cli.account.as_deref(), Some("1234567-8"));
    }

    #[test]
    fn test_investment_add_arguments() {
        let cli = Cli::try_parse_from([
            "financer",
            "investments",
            "add",
            "PETR4",
            "1500,50",
            "-d",
            "Petrobras",
        ])
        .unwrap();
        match cli.mode {
            Some(Mode::Investments {
                action:
                    InvestmentAction::Add {
                        ticker,
                        balance,
                        description,
                    },
            }) => {
                assert_eq!(ticker, "PETR4");
                assert_eq!(balance, "1500,50");
                assert_eq!(description.as_deref(), Some("Petrobras"));
            }
            _ => panic!("expected investments add"),
        }
    }

    #[test]
    fn test_base_url_flag_beats_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"base_url":"http://10.0.0.5:5000","categories":["Lazer"]}"#,
        )
        .unwrap();

        let from_file = resolve_config(Some(&path), None);
        assert_eq!(from_file.base_url, "http://10.0.0.5:5000");
        assert_eq!(from_file.categories, vec!["Lazer".to_string()]);

        let overridden = resolve_config(Some(&path), Some("http://localhost:5000".into()));
        assert_eq!(overridden.base_url, "http://localhost:5000");
        assert_eq!(overridden.categories, vec!["Lazer".to_string()]);
    }

    #[test]
    fn test_missing_credentials() {
        let auth = Auth {
            account: Some("1234567-8".into()),
            password: None,
        };
        assert!(matches!(auth.pair(), Err(CliError::MissingCredentials)));
    }
}
