//! # Storage Layer
//!
//! Persistence for tasklist. The todo list is one JSON array stored under
//! one key; [`SlotStore`] is the port, [`MemoryStore`] and [`FileStore`]
//! are the adapters.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Todos | JSON array | `.tasklist/todos_v1.json` |
//! | Config | TOML | `.tasklist/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`FileStore`] uses file locking (`fs2`) for concurrent access
//! - All writes are atomic (temp file + rename)

mod slot;
mod file;
mod config;
mod project;

pub use slot::{MemoryStore, PersistenceError, SlotStore, DEFAULT_MAX_SLOT_BYTES, STORAGE_KEY};
pub use file::FileStore;
pub use config::{Config, ConfigError, GlobalConfig, IdStrategy, OutputFormat, ProjectConfig, PROJECT_DIR};
pub use project::{Project, ProjectError};
