//! financer-tui - terminal frontend for the financer API using Ratatui

pub mod app;
pub mod components;
pub mod empty_state;
pub mod keybindings;
pub mod tabs;
pub mod theme;
pub mod ui;

pub use app::App;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use financer_core::{FinanceClient, FinancerConfig};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use tracing::info;

/// Run the TUI application until the user quits
pub async fn run(config: FinancerConfig) -> Result<()> {
    let client = FinanceClient::new(config.base_url.clone())?;
    info!(base_url = client.base_url(), "Starting TUI");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, &config);
    let mut ui = ui::Ui::new();

    let result = run_loop(&mut terminal, &mut app, &mut ui).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    ui: &mut ui::Ui,
) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    loop {
        // Fold finished requests into state
        app.poll_events();
        app.tick();

        terminal.draw(|f| ui.render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    ui.handle_key(key, app);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Let spawned request tasks progress on this thread too
        tokio::task::yield_now().await;
    }
}
