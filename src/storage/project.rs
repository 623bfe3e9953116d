//! Project management
//!
//! Handles project initialization and provides access to the todo slot.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::PROJECT_DIR;
use super::{Config, FileStore};
use crate::domain::TodoList;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a tasklist project. Run 'tasklist init' first.")]
    NotInProject,
}

/// A tasklist project: a directory containing `.tasklist/`
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(PROJECT_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(PROJECT_DIR);

        fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create {} directory: {}", PROJECT_DIR, data_dir.display())
        })?;

        let config_path = data_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# tasklist configuration

# Filter used by 'tasklist list' and the TUI: all, active or completed
default_filter = "all"

# Largest size of the persisted todo list, in bytes
max_slot_bytes = 5242880

# How new todo IDs are generated: clock or sequential
id_strategy = "clock"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = data_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Ignore interrupted writes and writer locks
*.tmp
*.lock

# Ignore TUI diagnostics
*.log
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .tasklist directory path
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the slot store, limited by the configured quota
    pub fn slot_store(&self) -> FileStore {
        FileStore::new(self.data_dir()).with_quota(self.config.project.max_slot_bytes)
    }

    /// Loads the todo list, starting on the configured default filter
    pub fn todo_list(&self) -> TodoList<FileStore> {
        let mut list = TodoList::load(
            self.slot_store(),
            self.config.project.id_strategy.generator(),
        );
        list.set_filter(self.config.project.default_filter);
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Filter;
    use crate::storage::STORAGE_KEY;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.data_dir().is_dir());
        assert!(project.data_dir().join("config.toml").is_file());
        assert!(project.data_dir().join(".gitignore").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        Project::init(dir.path()).unwrap(); // Should not fail

        assert!(dir.path().join(PROJECT_DIR).is_dir());
    }

    #[test]
    fn default_config_template_parses() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert_eq!(project.config().project.default_filter, Filter::All);
        assert_eq!(project.config().project.max_slot_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let result = Project::open(dir.path());

        assert!(result.is_err());
    }

    #[test]
    fn slot_lives_in_data_dir() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let store = project.slot_store();
        assert_eq!(
            store.path_for(STORAGE_KEY),
            dir.path().join(PROJECT_DIR).join("todos_v1.json")
        );
    }

    #[test]
    fn todo_list_persists_between_loads() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let mut list = project.todo_list();
        list.add("Buy milk");

        let reloaded = project.todo_list();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.todos()[0].title, "Buy milk");
    }

    #[test]
    fn todo_list_uses_default_filter() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();
        fs::write(
            dir.path().join(PROJECT_DIR).join("config.toml"),
            r#"default_filter = "active""#,
        )
        .unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.todo_list().filter(), Filter::Active);
    }
}
