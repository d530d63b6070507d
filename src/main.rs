//! # todo - Multi-list todo TUI
//!
//! A single-screen task manager: organise tasks into named lists, and
//! within a list add, edit, complete, delete, and assign due dates to
//! tasks.
//!
//! ## Key Features
//!
//! - **Named Lists**: tasks grouped into lists, switched with Left/Right
//! - **Due Dates**: natural-language entry ("tomorrow", "fri", "in 3d")
//!   with relative display
//! - **Snapshot Store**: all state held in one immutable snapshot value,
//!   replaced whole on every change - the display binds to the store and
//!   never mutates state itself
//!
//! ## Quick Start
//!
//! ```bash
//! todo
//! ```
//!
//! Then `n` for a new list, `a` for a new task, `h` for the full key map.
//!
//! State is in-memory for the session; nothing is written to disk.

use clap::Parser;

pub mod cli;
pub mod dates;
pub mod list;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
}

use cli::Cli;
use tui::app::App;

fn main() {
    let _cli = Cli::parse();

    if let Err(e) = run_tui() {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Set up the terminal, run the app, and restore the terminal.
fn run_tui() -> std::io::Result<()> {
    use crossterm::{
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{backend::CrosstermBackend, Terminal};
    use std::io;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
