#![deny(unsafe_code)]

//! promptpack TUI — interactive workbench for assembling context bundles.

use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use promptpack_config::AppConfig;
use promptpack_core::{Gateway, LocalGateway, LogCollector};

mod app;
mod clipboard;
mod event;
mod keymap;
mod panels;
mod tasks;
mod ui;

use app::App;
use clipboard::SystemClipboard;
use event::{spawn_event_task, AppEvent, EventHandler};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to the in-memory collector only; stdout belongs to ratatui.
    let collector = LogCollector::new(512);
    let log_reader = collector.reader();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(collector)
        .init();

    let config_path = PathBuf::from("promptpack.toml");
    let config = if config_path.exists() {
        match AppConfig::load(&config_path).await {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "failed to load promptpack.toml, using defaults");
                AppConfig::default()
            }
        }
    } else {
        AppConfig::default()
    };

    info!("starting promptpack TUI");

    let gateway: Arc<dyn Gateway> = Arc::new(
        LocalGateway::new(&config.storage.data_dir)
            .with_follow_symlinks(config.browse.follow_symlinks),
    );

    let EventHandler { tx, mut rx } = EventHandler::new();
    spawn_event_task(tx.clone(), Duration::from_millis(config.ui.tick_rate_ms));

    let mut app = App::new(
        config,
        gateway,
        Box::new(SystemClipboard::new()),
        log_reader,
        tx,
    );
    if let Some(dir) = app.config.browse.default_directory.clone() {
        app.start_browse(dir);
    }

    install_panic_hook();
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(&mut terminal, &mut app, &mut rx).await;

    restore_terminal()?;
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, app))?;

        match rx.recv().await {
            Some(AppEvent::Key(key)) => app.handle_key(key),
            Some(AppEvent::Resize(_, _)) => {}
            Some(AppEvent::Tick) => app.tick(),
            Some(AppEvent::Task(outcome)) => app.absorb(outcome),
            // The event task only stops when the channel is gone.
            None => break,
        }
    }
    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Restore the terminal before the panic message prints, then chain to the
/// previous hook. Ratatui does not restore on drop.
fn install_panic_hook() {
    let original = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original(info);
    }));
}
