//! tasklist - a local-first to-do list
//!
//! The core is [`TodoList`]: an ordered, newest-first collection of todos
//! with a view filter and a single edit session, persisted to a key-value
//! slot after every change. The CLI and terminal UI in [`cli`] are hosts
//! that drive it.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Filter, Todo, TodoId, TodoList};
