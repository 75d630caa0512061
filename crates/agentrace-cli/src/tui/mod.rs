//! Interactive timeline viewer.
//!
//! One view: a scrollable block pane with a navigation sidebar. The top-level
//! function owns the terminal; the viewer state never touches it, so it can
//! be driven directly in tests.

pub mod common;
pub mod viewer;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::Path;
use std::time::Duration;

use viewer::{ViewerAction, ViewerState};

use crate::commands::load_timeline;

/// Run the interactive viewer on one event log.
pub fn run_tui(path: &Path, goto: Option<&str>) -> Result<()> {
    let timeline = load_timeline(path)?;
    if timeline.blocks.is_empty() {
        println!("Session has no events.");
        return Ok(());
    }

    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut viewer = ViewerState::new(timeline, title, goto.map(str::to_string));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Install panic hook so we restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_app_loop(&mut terminal, &mut viewer);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run_app_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    viewer: &mut ViewerState,
) -> Result<()> {
    loop {
        terminal.draw(|f| viewer.draw(f))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                match viewer.handle_key(key) {
                    ViewerAction::Quit => break,
                    ViewerAction::None => {}
                }
            }
        }
    }
    Ok(())
}
