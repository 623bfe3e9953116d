//! Todo identifiers and their generators
//!
//! IDs are plain integers on the wire. Fresh IDs come from an injected
//! [`IdGenerator`] so tests can use [`SequentialIds`] while the CLI uses
//! [`ClockIds`], which derives IDs from the creation timestamp.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid todo ID: expected a positive integer, got '{0}'")]
    InvalidTodoId(String),
}

/// Identifier of a single todo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw integer value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(TodoId)
            .map_err(|_| IdError::InvalidTodoId(s.to_string()))
    }
}

impl From<u64> for TodoId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Source of fresh todo IDs
pub trait IdGenerator {
    /// Returns an ID that has not been handed out before
    ///
    /// `None` once the ID space above the last handed-out ID is used up.
    fn next_id(&mut self) -> Option<TodoId>;

    /// Guarantees every later ID is strictly greater than `id`
    fn advance_past(&mut self, id: TodoId);
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> Option<TodoId> {
        (**self).next_id()
    }

    fn advance_past(&mut self, id: TodoId) {
        (**self).advance_past(id)
    }
}

/// Millisecond-timestamp IDs, bumped when two todos land in the same tick
#[derive(Debug, Default)]
pub struct ClockIds {
    last: u64,
}

impl ClockIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for ClockIds {
    fn next_id(&mut self) -> Option<TodoId> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = now.max(self.last.checked_add(1)?);
        Some(TodoId(self.last))
    }

    fn advance_past(&mut self, id: TodoId) {
        self.last = self.last.max(id.0);
    }
}

/// Counting IDs starting at 1
#[derive(Debug, Default)]
pub struct SequentialIds {
    last: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> Option<TodoId> {
        self.last = self.last.checked_add(1)?;
        Some(TodoId(self.last))
    }

    fn advance_past(&mut self, id: TodoId) {
        self.last = self.last.max(id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_todo_id() {
        let id: TodoId = "1712345678901".parse().unwrap();
        assert_eq!(id.value(), 1712345678901);
        assert_eq!(id.to_string(), "1712345678901");
    }

    #[test]
    fn parse_todo_id_trims_whitespace() {
        let id: TodoId = " 42 ".parse().unwrap();
        assert_eq!(id, TodoId::new(42));
    }

    #[test]
    fn invalid_todo_ids() {
        assert!("".parse::<TodoId>().is_err());
        assert!("abc".parse::<TodoId>().is_err());
        assert!("-5".parse::<TodoId>().is_err());
        assert_eq!(
            "t-1".parse::<TodoId>(),
            Err(IdError::InvalidTodoId("t-1".to_string()))
        );
    }

    #[test]
    fn todo_id_serializes_as_integer() {
        let json = serde_json::to_string(&TodoId::new(7)).unwrap();
        assert_eq!(json, "7");

        let parsed: TodoId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, TodoId::new(7));
    }

    #[test]
    fn clock_ids_are_strictly_increasing() {
        let mut ids = ClockIds::new();
        let generated: Vec<_> = (0..1000).filter_map(|_| ids.next_id()).collect();

        for pair in generated.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn clock_ids_advance_past_future_ids() {
        let mut ids = ClockIds::new();
        let far_future = TodoId::new(u64::MAX / 2);
        ids.advance_past(far_future);

        assert!(ids.next_id().unwrap() > far_future);
    }

    #[test]
    fn sequential_ids_start_at_one() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), Some(TodoId::new(1)));
        assert_eq!(ids.next_id(), Some(TodoId::new(2)));
    }

    #[test]
    fn sequential_ids_advance_past() {
        let mut ids = SequentialIds::new();
        ids.advance_past(TodoId::new(10));
        assert_eq!(ids.next_id(), Some(TodoId::new(11)));

        // Advancing to an older ID never rewinds
        ids.advance_past(TodoId::new(3));
        assert_eq!(ids.next_id(), Some(TodoId::new(12)));
    }

    #[test]
    fn ids_run_out_at_the_top_of_the_range() {
        let mut sequential = SequentialIds::new();
        sequential.advance_past(TodoId::new(u64::MAX - 1));
        assert_eq!(sequential.next_id(), Some(TodoId::new(u64::MAX)));
        assert_eq!(sequential.next_id(), None);

        let mut clock = ClockIds::new();
        clock.advance_past(TodoId::new(u64::MAX));
        assert_eq!(clock.next_id(), None);
    }
}
