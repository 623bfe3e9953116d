//! Todo domain model
//!
//! A todo is one entry on the list. The persisted form is a JSON object
//! with `id`, `title`, `completed` and `createdAt` (milliseconds).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::TodoId;

/// A single todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier, fixed at creation
    pub id: TodoId,

    /// Display text, trimmed and never empty
    pub title: String,

    /// Whether the todo is done
    #[serde(default)]
    pub completed: bool,

    /// When the todo was created
    #[serde(rename = "createdAt", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates an open todo; the caller is responsible for trimming the title
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self::with_created_at(id, title, Utc::now())
    }

    /// Creates an open todo with an explicit creation time
    pub fn with_created_at(id: TodoId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            created_at,
        }
    }

    /// Flips the completion flag and returns the new value
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    /// Returns true if this todo is shown under the given filter
    pub fn matches(&self, filter: Filter) -> bool {
        match filter {
            Filter::All => true,
            Filter::Active => !self.completed,
            Filter::Completed => self.completed,
        }
    }
}

/// View selector over the todo list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown filter '{0}': expected all, active or completed")]
pub struct FilterParseError(String);

impl FromStr for Filter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "a" => Ok(Filter::All),
            "active" | "open" => Ok(Filter::Active),
            "completed" | "done" => Ok(Filter::Completed),
            _ => Err(FilterParseError(s.to_string())),
        }
    }
}

/// The in-progress title edit, if any
///
/// Transient UI state: it is never written to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    editing_id: Option<TodoId>,
    buffer: String,
}

impl EditSession {
    /// Begins editing `id`, replacing any previous session
    pub fn start(&mut self, id: TodoId, title: &str) {
        self.editing_id = Some(id);
        self.buffer = title.to_string();
    }

    /// Clears the session without touching any todo
    pub fn cancel(&mut self) {
        self.editing_id = None;
        self.buffer.clear();
    }

    pub fn editing_id(&self) -> Option<TodoId> {
        self.editing_id
    }

    pub fn is_editing(&self, id: TodoId) -> bool {
        self.editing_id == Some(id)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }
}
