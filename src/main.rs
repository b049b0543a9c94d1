// tido - A TUI task tracker
// Entry point for the application

mod app;
mod event;
mod models;
mod storage;
mod store;
mod ui;

use crate::storage::FileStorage;
use crate::store::TaskListStore;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity; off by default so the TUI stays clean
    env_logger::init();

    let data_file = std::env::var_os("TIDO_TASKS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(FileStorage::default_path);
    let store = TaskListStore::initialize(FileStorage::new(data_file));

    // Initialize the terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run the app
    let mut app = app::App::new(store);
    let result = app.run(&mut terminal);

    // Cleanup and restore terminal on exit
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors that occurred during app execution
    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
