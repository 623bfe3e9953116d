//! # Command-Line Interface
//!
//! User-facing commands and output formatting. Every command opens the
//! project's [`TodoList`](crate::domain::TodoList), runs one operation and
//! prints the result.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Create `.tasklist/` in a directory |
//! | `add`, `edit`, `remove` | Manage single todos |
//! | `toggle`, `toggle-all`, `clear-completed` | Completion state |
//! | `list`, `count` | Views (`list --filter active`) |
//! | `tui` | Interactive terminal UI |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! `--verbose` (or `-v`) prints command narration and enables debug logs.
//! `RUST_LOG` overrides the log filter.

mod app;
mod logging;
mod output;
mod todo;
mod tui;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
