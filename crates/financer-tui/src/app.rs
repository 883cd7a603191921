//! TUI application state
//!
//! `App` owns the session, the fetched lists and the event receiver. Requests
//! run as tokio tasks that publish a [`FinanceEvent`] when done; `poll_events`
//! folds those back into state once per frame.

use crate::components::{Spinner, ToastManager};
use crate::keybindings::{KeyAction, KeyBindings};
use chrono::{DateTime, Local};
use financer_core::config::ColorScheme;
use financer_core::import::ImportSelection;
use financer_core::{
    flows, Alert, CategoryUpdate, Credentials, EventBus, FinanceClient, FinanceEvent,
    FinancerConfig, Generation, Investment, InvestmentId, MonthlyBalance, NewInvestment, Registration,
    Session, Transaction,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Active tab in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Transactions,
    Investments,
    Import,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Dashboard,
            Tab::Transactions,
            Tab::Investments,
            Tab::Import,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Transactions => 1,
            Tab::Investments => 2,
            Tab::Import => 3,
        }
    }

    pub fn from_index(idx: usize) -> Self {
        match idx {
            1 => Tab::Transactions,
            2 => Tab::Investments,
            3 => Tab::Import,
            _ => Tab::Dashboard,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Transactions => "Transactions",
            Tab::Investments => "Investments",
            Tab::Import => "Import",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            Tab::Dashboard => '1',
            Tab::Transactions => '2',
            Tab::Investments => '3',
            Tab::Import => '4',
        }
    }
}

/// Login screen mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// A fetched list plus its loading flag
#[derive(Debug, Clone)]
pub struct Loadable<T> {
    pub items: Vec<T>,
    pub loading: bool,
    /// Whether a fetch has completed at least once
    pub fetched: bool,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            fetched: false,
        }
    }
}

impl<T> Loadable<T> {
    fn start(&mut self) {
        self.loading = true;
    }

    fn finish(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
        self.fetched = true;
    }

    /// Fetch finished and nothing came back
    pub fn is_empty_result(&self) -> bool {
        !self.loading && self.items.is_empty()
    }
}

/// TUI application state
pub struct App {
    client: FinanceClient,
    event_bus: EventBus,
    event_rx: broadcast::Receiver<FinanceEvent>,

    /// Present from login until logout
    pub session: Option<Session>,
    /// Stamp for requests issued under the current session
    generation: Generation,
    pub auth_mode: AuthMode,
    /// Login or registration request in flight
    pub auth_pending: bool,

    pub active_tab: Tab,
    pub should_quit: bool,

    pub balances: Loadable<MonthlyBalance>,
    pub transactions: Loadable<Transaction>,
    pub investments: Loadable<Investment>,
    pub import: ImportSelection,
    pub upload_pending: bool,

    pub categories: Vec<String>,
    pub color_scheme: ColorScheme,
    pub keybindings: KeyBindings,
    pub toast_manager: ToastManager,
    pub spinner: Spinner,
    pub last_refresh: Option<DateTime<Local>>,
}

impl App {
    pub fn new(client: FinanceClient, config: &FinancerConfig) -> Self {
        let event_bus = EventBus::default_capacity();
        let event_rx = event_bus.subscribe();

        Self {
            client,
            event_bus,
            event_rx,
            session: None,
            generation: 0,
            auth_mode: AuthMode::Login,
            auth_pending: false,
            active_tab: Tab::Dashboard,
            should_quit: false,
            balances: Loadable::default(),
            transactions: Loadable::default(),
            investments: Loadable::default(),
            import: ImportSelection::new(),
            upload_pending: false,
            categories: config.categories.clone(),
            color_scheme: config.color_scheme,
            keybindings: KeyBindings::new(),
            toast_manager: ToastManager::new(),
            spinner: Spinner::new(),
            last_refresh: None,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the active screen has a request in flight
    pub fn is_busy(&self) -> bool {
        if self.session.is_none() {
            return self.auth_pending;
        }
        match self.active_tab {
            Tab::Dashboard => self.balances.loading,
            Tab::Transactions => self.transactions.loading,
            Tab::Investments => self.investments.loading,
            Tab::Import => self.upload_pending,
        }
    }

    pub fn notify(&mut self, alert: Alert) {
        debug!(alert = %alert, "Alert");
        self.toast_manager.push(alert);
    }

    /// Handle a global key. Returns true if the key was consumed.
    ///
    /// `typing` is true while a text field has focus; only force-quit passes.
    pub fn handle_key(
        &mut self,
        code: crossterm::event::KeyCode,
        modifiers: crossterm::event::KeyModifiers,
        typing: bool,
    ) -> bool {
        let Some(action) = self.keybindings.get_action(code, modifiers) else {
            return false;
        };
        if typing && !action.works_while_typing() {
            return false;
        }
        // Outside a session only quitting is global
        if self.session.is_none() && !matches!(action, KeyAction::Quit | KeyAction::ForceQuit) {
            return false;
        }

        match action {
            KeyAction::Quit | KeyAction::ForceQuit => self.should_quit = true,
            KeyAction::Refresh => self.refresh(self.active_tab),
            KeyAction::Logout => self.logout(),
            KeyAction::NextTab => {
                let next = (self.active_tab.index() + 1) % Tab::all().len();
                self.activate(Tab::from_index(next));
            }
            KeyAction::PrevTab => {
                let len = Tab::all().len();
                let prev = (self.active_tab.index() + len - 1) % len;
                self.activate(Tab::from_index(prev));
            }
            KeyAction::JumpDashboard => self.activate(Tab::Dashboard),
            KeyAction::JumpTransactions => self.activate(Tab::Transactions),
            KeyAction::JumpInvestments => self.activate(Tab::Investments),
            KeyAction::JumpImport => self.activate(Tab::Import),
        }
        true
    }

    /// Switch tab, fetching its data on first visit
    pub fn activate(&mut self, tab: Tab) {
        self.active_tab = tab;
        let needs_fetch = match tab {
            Tab::Dashboard => !self.balances.fetched && !self.balances.loading,
            Tab::Transactions => !self.transactions.fetched && !self.transactions.loading,
            Tab::Investments => !self.investments.fetched && !self.investments.loading,
            Tab::Import => false,
        };
        if needs_fetch {
            self.refresh(tab);
        }
    }

    /// Drop the session and every fetched list
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(holder = session.display_name(), "Logged out");
        }
        // Requests still in flight belong to the old session
        self.generation += 1;
        self.balances = Loadable::default();
        self.transactions = Loadable::default();
        self.investments = Loadable::default();
        self.import.clear();
        self.upload_pending = false;
        self.active_tab = Tab::Dashboard;
        self.auth_mode = AuthMode::Login;
    }

    // ===================
    // Request tasks
    // ===================

    pub fn submit_login(&mut self, credentials: Credentials) {
        self.auth_pending = true;
        let client = self.client.clone();
        let bus = self.event_bus.clone();
        tokio::spawn(async move {
            let event = match client.login(&credentials).await {
                Ok(session) => FinanceEvent::LoggedIn(session),
                Err(e) => {
                    warn!(error = %e, "Login failed");
                    FinanceEvent::AuthFailed(flows::login_failure_alert(&e))
                }
            };
            bus.publish(event);
        });
    }

    pub fn submit_registration(&mut self, registration: Registration) {
        self.auth_pending = true;
        let client = self.client.clone();
        let bus = self.event_bus.clone();
        tokio::spawn(async move {
            let event = match client.register(&registration).await {
                Ok(message) => FinanceEvent::Registered(message),
                Err(e) => {
                    warn!(error = %e, "Registration failed");
                    FinanceEvent::AuthFailed(Alert::from_core_error(
                        "Register",
                        "Could not create the account",
                        &e,
                    ))
                }
            };
            bus.publish(event);
        });
    }

    /// Re-fetch the list behind `tab`
    pub fn refresh(&mut self, tab: Tab) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let client = self.client.clone();
        let bus = self.event_bus.clone();
        let generation = self.generation;

        match tab {
            Tab::Dashboard => {
                self.balances.start();
                tokio::spawn(async move {
                    let list = flows::fetch_dashboard(&client, &session).await;
                    bus.publish(FinanceEvent::DashboardLoaded { generation, list });
                });
            }
            Tab::Transactions => {
                self.transactions.start();
                tokio::spawn(async move {
                    let list = flows::fetch_transactions(&client, &session).await;
                    bus.publish(FinanceEvent::TransactionsLoaded { generation, list });
                });
            }
            Tab::Investments => {
                self.investments.start();
                tokio::spawn(async move {
                    let list = flows::fetch_investments(&client, &session).await;
                    bus.publish(FinanceEvent::InvestmentsLoaded { generation, list });
                });
            }
            Tab::Import => {}
        }
    }

    pub fn submit_category(&mut self, update: CategoryUpdate) {
        let Some(session) = self.session.clone() else {
            return;
        };
        self.transactions.start();
        let client = self.client.clone();
        let bus = self.event_bus.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = flows::categorize(&client, &session, &update).await;
            bus.publish(FinanceEvent::Notice {
                generation,
                alert: outcome.alert,
            });
            bus.publish(FinanceEvent::TransactionsLoaded {
                generation,
                list: outcome.refreshed,
            });
        });
    }

    pub fn submit_investment(&mut self, investment: NewInvestment) {
        let Some(session) = self.session.clone() else {
            return;
        };
        self.investments.start();
        let client = self.client.clone();
        let bus = self.event_bus.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = flows::add_investment(&client, &session, &investment).await;
            bus.publish(FinanceEvent::Notice {
                generation,
                alert: outcome.alert,
            });
            bus.publish(FinanceEvent::InvestmentsLoaded {
                generation,
                list: outcome.refreshed,
            });
        });
    }

    pub fn remove_investment(&mut self, id: InvestmentId) {
        let Some(session) = self.session.clone() else {
            return;
        };
        self.investments.start();
        let client = self.client.clone();
        let bus = self.event_bus.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = flows::remove_investment(&client, &session, id).await;
            bus.publish(FinanceEvent::Notice {
                generation,
                alert: outcome.alert,
            });
            bus.publish(FinanceEvent::InvestmentsLoaded {
                generation,
                list: outcome.refreshed,
            });
        });
    }

    /// Upload the pending file; warns instead when nothing is selected
    pub fn submit_upload(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let file = match self.import.require() {
            Ok(file) => file.clone(),
            Err(e) => {
                self.notify(Alert::from_core_error("Import", "Select a file first", &e));
                return;
            }
        };
        self.upload_pending = true;
        let client = self.client.clone();
        let bus = self.event_bus.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let (succeeded, alert) = flows::upload_statement(&client, &session, &file).await;
            bus.publish(FinanceEvent::Notice { generation, alert });
            bus.publish(FinanceEvent::UploadFinished {
                generation,
                succeeded,
            });
        });
    }

    // ===================
    // Event folding
    // ===================

    /// Drain pending events (non-blocking)
    pub fn poll_events(&mut self) {
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => self.apply(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event receiver lagged");
                }
                Err(_) => break,
            }
        }
    }

    /// Fold one event into state
    pub fn apply(&mut self, event: FinanceEvent) {
        match event {
            FinanceEvent::LoggedIn(session) => {
                self.auth_pending = false;
                let greeting = format!("Welcome, {}", session.display_name());
                self.session = Some(session);
                self.notify(Alert::success("Login", greeting));
                self.activate(Tab::Dashboard);
            }
            FinanceEvent::Registered(message) => {
                self.auth_pending = false;
                self.auth_mode = AuthMode::Login;
                let message = message.unwrap_or_else(|| "Account created, you can log in".into());
                self.notify(Alert::success("Register", message));
            }
            FinanceEvent::AuthFailed(alert) => {
                self.auth_pending = false;
                self.notify(alert);
            }
            FinanceEvent::DashboardLoaded { generation, list } if self.is_current(generation) => {
                self.balances.finish(list);
                self.last_refresh = Some(Local::now());
            }
            FinanceEvent::TransactionsLoaded { generation, list } if self.is_current(generation) => {
                self.transactions.finish(list);
                self.last_refresh = Some(Local::now());
            }
            FinanceEvent::InvestmentsLoaded { generation, list } if self.is_current(generation) => {
                self.investments.finish(list);
                self.last_refresh = Some(Local::now());
            }
            FinanceEvent::Notice { generation, alert } if self.is_current(generation) => {
                self.notify(alert);
            }
            FinanceEvent::UploadFinished {
                generation,
                succeeded,
            } if self.is_current(generation) => {
                self.upload_pending = false;
                if succeeded {
                    self.import.clear();
                }
            }
            // Results from a previous session are dropped
            _ => debug!("Dropping result of an ended session"),
        }
    }

    /// Whether a result stamped `generation` belongs to the live session
    fn is_current(&self, generation: Generation) -> bool {
        self.session.is_some() && generation == self.generation
    }

    /// Per-frame housekeeping
    pub fn tick(&mut self) {
        self.spinner.tick();
        self.toast_manager.clear_expired();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use financer_core::TransactionId;

    fn app() -> App {
        let client = FinanceClient::new("http://127.0.0.1:9").unwrap();
        App::new(client, &FinancerConfig::default())
    }

    fn tx(id: i64) -> Transaction {
        Transaction {
            id: TransactionId(id),
            date: "2024-01-02".into(),
            kind: "Pix".into(),
            detail: "Mercado".into(),
            credit: 0.0,
            debit: 12.0,
            category: None,
        }
    }

    #[test]
    fn test_tab_round_trip() {
        for tab in Tab::all() {
            assert_eq!(Tab::from_index(tab.index()), *tab);
        }
        assert_eq!(Tab::from_index(99), Tab::Dashboard);
    }

    #[test]
    fn test_quit_outside_session() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('2'), KeyModifiers::NONE, false));
        assert_eq!(app.active_tab, Tab::Dashboard);
        assert!(app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE, false));
        assert!(app.should_quit);
    }

    #[test]
    fn test_typing_blocks_quit_but_not_ctrl_c() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE, true));
        assert!(!app.should_quit);
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL, true));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_login_event_opens_dashboard() {
        let mut app = app();
        app.auth_pending = true;
        app.apply(FinanceEvent::LoggedIn(Session::new("t", Some("Ana".into()))));

        assert!(app.is_authenticated());
        assert!(!app.auth_pending);
        assert_eq!(app.active_tab, Tab::Dashboard);
        assert!(app.balances.loading);
        assert_eq!(app.toast_manager.len(), 1);
    }

    #[tokio::test]
    async fn test_tab_switch_fetches_once() {
        let mut app = app();
        app.session = Some(Session::new("t", None));

        assert!(app.handle_key(KeyCode::Char('2'), KeyModifiers::NONE, false));
        assert_eq!(app.active_tab, Tab::Transactions);
        assert!(app.transactions.loading);

        app.apply(FinanceEvent::TransactionsLoaded {
            generation: app.generation,
            list: vec![tx(1)],
        });
        assert!(!app.transactions.loading);
        assert!(app.transactions.fetched);

        app.activate(Tab::Dashboard);
        app.activate(Tab::Transactions);
        assert!(!app.transactions.loading);
        assert_eq!(app.transactions.items.len(), 1);
    }

    #[test]
    fn test_logout_clears_state_and_drops_late_results() {
        let mut app = app();
        app.session = Some(Session::new("t", None));
        app.transactions.finish(vec![tx(1), tx(2)]);
        app.active_tab = Tab::Import;

        let stale = app.generation;
        app.logout();
        assert!(!app.is_authenticated());
        assert!(app.transactions.items.is_empty());
        assert_eq!(app.active_tab, Tab::Dashboard);

        app.apply(FinanceEvent::TransactionsLoaded {
            generation: stale,
            list: vec![tx(3)],
        });
        assert!(app.transactions.items.is_empty());
    }

    #[tokio::test]
    async fn test_results_of_previous_session_never_reach_the_next() {
        let mut app = app();
        app.session = Some(Session::new("token-a", Some("Ana".into())));
        let issued_by_ana = app.generation;

        app.logout();
        app.apply(FinanceEvent::LoggedIn(Session::new("token-b", Some("Bia".into()))));
        app.toast_manager = ToastManager::new();

        let mut private = tx(7);
        private.detail = "Ana private".into();
        app.apply(FinanceEvent::TransactionsLoaded {
            generation: issued_by_ana,
            list: vec![private],
        });
        app.apply(FinanceEvent::InvestmentsLoaded {
            generation: issued_by_ana,
            list: Vec::new(),
        });
        app.apply(FinanceEvent::Notice {
            generation: issued_by_ana,
            alert: Alert::success("Categorize", "Saved for Ana"),
        });

        assert!(app.transactions.items.is_empty());
        assert!(!app.investments.fetched);
        assert_eq!(app.toast_manager.len(), 0);

        app.apply(FinanceEvent::TransactionsLoaded {
            generation: app.generation,
            list: vec![tx(8)],
        });
        assert_eq!(app.transactions.items.len(), 1);
        assert_eq!(app.transactions.items[0].id, TransactionId(8));
    }

    #[test]
    fn test_upload_success_clears_selection_failure_keeps_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jan.xlsx");
        std::fs::write(&path, b"PK").unwrap();
        let file = financer_core::SelectedFile::from_path(&path).unwrap();

        let mut app = app();
        app.session = Some(Session::new("t", None));
        app.import.select(file);

        app.upload_pending = true;
        app.apply(FinanceEvent::UploadFinished {
            generation: app.generation,
            succeeded: false,
        });
        assert!(!app.upload_pending);
        assert!(!app.import.is_empty());

        app.apply(FinanceEvent::UploadFinished {
            generation: app.generation,
            succeeded: true,
        });
        assert!(app.import.is_empty());
    }

    #[test]
    fn test_upload_without_selection_warns() {
        let mut app = app();
        app.session = Some(Session::new("t", None));
        app.submit_upload();
        assert!(!app.upload_pending);
        assert_eq!(app.toast_manager.len(), 1);
    }

    #[test]
    fn test_registered_returns_to_login_mode() {
        let mut app = app();
        app.auth_mode = AuthMode::Register;
        app.auth_pending = true;
        app.apply(FinanceEvent::Registered(Some("Conta criada".into())));
        assert_eq!(app.auth_mode, AuthMode::Login);
        assert!(!app.auth_pending);
        assert_eq!(
            app.toast_manager.latest().map(|t| t.message.as_str()),
            Some("Register: Conta criada")
        );
    }
}
