//! Domain models for tasklist
//!
//! Contains the todo model and the list manager. Storage is reached only
//! through the [`SlotStore`](crate::storage::SlotStore) port.

mod id;
mod todo;
mod list;

pub use id::{ClockIds, IdError, IdGenerator, SequentialIds, TodoId};
pub use todo::{EditSession, Filter, FilterParseError, Todo};
pub use list::{EditOutcome, TodoList};
