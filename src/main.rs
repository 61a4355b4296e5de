//! Cosmere Archivist - terminal client for the Archive of the Shards
//!
//! Renders a running dialogue with the remote keeper and manages one
//! outstanding question/answer exchange at a time.

mod app;
mod archive;
mod config;
mod runtime;
mod session;
mod ui;

use app::App;
use archive::{ArchiveClient, LoggingService};
use config::ArchivistConfig;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ArchivistConfig::from_env();

    // Initialize logging; the alternate screen owns stdout, so traces go
    // to a file instead
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::File::create(&config.log_path)?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    tracing::info!(endpoint = %config.endpoint, "Starting archivist session");

    let service = LoggingService::new(ArchiveClient::new(config.endpoint.clone()));
    let mut app = App::new(service);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Restore the terminal before reporting any failure
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("Session ended");
    result?;
    Ok(())
}
