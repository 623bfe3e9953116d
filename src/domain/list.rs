//! The todo list manager
//!
//! [`TodoList`] owns the ordered collection, the current [`Filter`] and the
//! [`EditSession`]. Every mutation rewrites the whole collection to the
//! [`STORAGE_KEY`] slot before returning. Storage failures never reach the
//! caller: a bad slot on startup yields an empty list, a failed write keeps
//! the in-memory state and is logged.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::id::{IdGenerator, TodoId};
use super::todo::{EditSession, Filter, Todo};
use crate::storage::{PersistenceError, SlotStore, STORAGE_KEY};

/// Result of [`TodoList::save_edit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The title was updated
    Saved,
    /// The buffer was blank, so the todo was deleted
    Removed(Todo),
}

/// Ordered, persisted collection of todos (newest first)
pub struct TodoList<S: SlotStore> {
    todos: Vec<Todo>,
    edit: EditSession,
    filter: Filter,
    store: S,
    ids: Box<dyn IdGenerator>,
    last_persist_error: Option<PersistenceError>,
}

impl<S: SlotStore> TodoList<S> {
    /// Creates a manager and hydrates it from the store
    ///
    /// Missing or unreadable data results in an empty list.
    pub fn load(store: S, ids: impl IdGenerator + 'static) -> Self {
        let mut ids: Box<dyn IdGenerator> = Box::new(ids);

        let todos = match hydrate(&store) {
            Ok(todos) => {
                debug!(count = todos.len(), key = STORAGE_KEY, "Loaded todos");
                todos
            }
            Err(e) => {
                warn!(error = %e, "Failed to load todos, starting with an empty list");
                Vec::new()
            }
        };

        if let Some(max) = todos.iter().map(|t| t.id).max() {
            ids.advance_past(max);
        }

        Self {
            todos,
            edit: EditSession::default(),
            filter: Filter::default(),
            store,
            ids,
            last_persist_error: None,
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Adds a todo at the front of the list
    ///
    /// Returns `None` without touching anything when the trimmed title is
    /// empty. A `Some` tells the host it may clear its input.
    pub fn add(&mut self, title: &str) -> Option<TodoId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        let id = self.fresh_id();
        self.todos.insert(0, Todo::new(id, title));
        self.persist();

        Some(id)
    }

    /// Flips completion of a todo, returning the new state
    pub fn toggle(&mut self, id: TodoId) -> Option<bool> {
        let completed = self.todos.iter_mut().find(|t| t.id == id)?.toggle();
        self.persist();
        Some(completed)
    }

    /// Removes a todo, cancelling its edit session if one is open
    pub fn remove(&mut self, id: TodoId) -> Option<Todo> {
        let index = self.todos.iter().position(|t| t.id == id)?;
        let removed = self.todos.remove(index);

        if self.edit.is_editing(id) {
            self.edit.cancel();
        }

        self.persist();
        Some(removed)
    }

    /// Opens an edit session on a todo, abandoning any previous one
    pub fn start_edit(&mut self, id: TodoId) -> bool {
        let Some(todo) = self.todos.iter().find(|t| t.id == id) else {
            return false;
        };
        self.edit.start(id, &todo.title);
        true
    }

    /// Replaces the edit buffer
    pub fn set_edit_buffer(&mut self, text: impl Into<String>) {
        *self.edit.buffer_mut() = text.into();
    }

    /// Mutable access to the edit buffer for hosts that edit in place
    pub fn edit_buffer_mut(&mut self) -> &mut String {
        self.edit.buffer_mut()
    }

    /// Commits the edit buffer as the todo's title
    ///
    /// A buffer that is blank after trimming deletes the todo instead.
    pub fn save_edit(&mut self, id: TodoId) -> Option<EditOutcome> {
        let title = self.edit.buffer().trim().to_string();
        if title.is_empty() {
            return self.remove(id).map(EditOutcome::Removed);
        }

        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.title = title;
        self.edit.cancel();
        self.persist();

        Some(EditOutcome::Saved)
    }

    /// Drops the edit session without changing any todo
    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }

    /// Removes every completed todo, returning how many were removed
    pub fn clear_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|t| !t.completed);
        let removed = before - self.todos.len();

        if let Some(editing) = self.edit.editing_id() {
            if !self.contains(editing) {
                self.edit.cancel();
            }
        }

        self.persist();
        removed
    }

    /// Sets completion on every todo
    pub fn toggle_all(&mut self, checked: bool) {
        for todo in &mut self.todos {
            todo.completed = checked;
        }
        self.persist();
    }

    /// Changes the view filter (never persisted)
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Todos matching the current filter, in list order
    pub fn filtered(&self) -> impl Iterator<Item = &Todo> + Clone + '_ {
        self.filtered_by(self.filter)
    }

    /// Todos matching `filter`, in list order
    pub fn filtered_by(&self, filter: Filter) -> impl Iterator<Item = &Todo> + Clone + '_ {
        self.todos.iter().filter(move |t| t.matches(filter))
    }

    /// Number of todos not yet completed
    pub fn remaining_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    /// Number of completed todos
    pub fn completed_count(&self) -> usize {
        self.todos.len() - self.remaining_count()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TodoId) -> bool {
        self.todos.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn editing_id(&self) -> Option<TodoId> {
        self.edit.editing_id()
    }

    pub fn is_editing(&self, id: TodoId) -> bool {
        self.edit.is_editing(id)
    }

    pub fn edit_buffer(&self) -> &str {
        self.edit.buffer()
    }

    /// The error from the most recent write, cleared by the next success
    pub fn last_persist_error(&self) -> Option<&PersistenceError> {
        self.last_persist_error.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn into_store(self) -> S {
        self.store
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn fresh_id(&mut self) -> TodoId {
        while let Some(id) = self.ids.next_id() {
            if !self.contains(id) {
                return id;
            }
        }

        // The generator is exhausted; reuse the smallest free ID instead
        let used: HashSet<TodoId> = self.todos.iter().map(|t| t.id).collect();
        let mut candidate = 1;
        while used.contains(&TodoId::new(candidate)) {
            candidate += 1;
        }
        TodoId::new(candidate)
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.todos)
            .map_err(|e| PersistenceError::write(STORAGE_KEY, e))
            .and_then(|json| self.store.write(STORAGE_KEY, &json));

        match result {
            Ok(()) => {
                debug!(count = self.todos.len(), key = STORAGE_KEY, "Persisted todos");
                self.last_persist_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist todos, keeping in-memory state");
                self.last_persist_error = Some(e);
            }
        }
    }
}

/// Reads and sanitises the persisted collection
///
/// The slot must hold a JSON array. Individual records that fail to parse,
/// have a blank title, or repeat an earlier id are dropped.
fn hydrate<S: SlotStore>(store: &S) -> Result<Vec<Todo>, PersistenceError> {
    let raw = match store.read(STORAGE_KEY)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(Vec::new()),
    };

    let records: Vec<serde_json::Value> =
        serde_json::from_str(&raw).map_err(|e| PersistenceError::read(STORAGE_KEY, e))?;

    let mut seen = HashSet::new();
    let mut todos = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let mut todo: Todo = match serde_json::from_value(record) {
            Ok(todo) => todo,
            Err(e) => {
                warn!(index, error = %e, "Dropping malformed todo record");
                continue;
            }
        };

        todo.title = todo.title.trim().to_string();
        if todo.title.is_empty() {
            warn!(index, id = %todo.id, "Dropping todo record with empty title");
            continue;
        }

        if !seen.insert(todo.id) {
            warn!(index, id = %todo.id, "Dropping todo record with duplicate id");
            continue;
        }

        todos.push(todo);
    }

    Ok(todos)
}
