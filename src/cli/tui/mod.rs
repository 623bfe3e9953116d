//! Interactive TUI for tasklist
//!
//! A terminal host for the todo list using ratatui: it renders the filtered
//! view and the remaining count, and maps key presses onto list operations.

mod app;
mod event;
mod ui;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::Output;
use crate::storage::Project;
use app::App;
use event::EventHandler;

/// Launch the TUI
pub fn run(output: &Output, project: &Project) -> Result<()> {
    output.verbose_ctx("tui", "Initializing TUI application");

    let mut app = App::new(project.todo_list());

    let mut terminal = ui::init_terminal()?;
    let event_handler = EventHandler::new(250);

    // Run the main loop with panic safety so the terminal is always restored
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        app.run(&mut terminal, event_handler)
    }));

    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else {
                Err(anyhow!("TUI panicked with unknown error"))
            }
        }
    }
}
