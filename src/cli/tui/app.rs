//! TUI application state and key handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event::{Event, EventHandler};
use super::ui::{self, Terminal};
use crate::domain::{EditOutcome, Filter, TodoId, TodoList};
use crate::storage::SlotStore;

const HELP: &str =
    "j/k:move space:toggle n:new e:edit d:delete a:all C:clear 1/2/3:filter q:quit";

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing the title of a new todo
    NewTodo(String),
    /// Editing an existing todo; the text lives in the list's edit buffer
    Editing(TodoId),
}

/// Application state
pub struct App<S: SlotStore> {
    list: TodoList<S>,
    input_mode: InputMode,
    /// Index into the filtered view
    selected: usize,
    status_message: Option<String>,
    should_quit: bool,
}

impl<S: SlotStore> App<S> {
    pub fn new(list: TodoList<S>) -> Self {
        Self {
            list,
            input_mode: InputMode::Normal,
            selected: 0,
            status_message: None,
            should_quit: false,
        }
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit() {
            terminal.draw(|frame| ui::draw(frame, self))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize | Event::Tick => {}
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors used by the renderer
    // ------------------------------------------------------------------

    pub fn list(&self) -> &TodoList<S> {
        &self.list
    }

    pub fn input_mode(&self) -> &InputMode {
        &self.input_mode
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// ID of the highlighted todo in the filtered view
    pub fn selected_id(&self) -> Option<TodoId> {
        self.list.filtered().nth(self.selected).map(|t| t.id)
    }

    // ------------------------------------------------------------------
    // Key handling
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode.clone() {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::NewTodo(text) => self.handle_new_todo_key(key, text),
            InputMode::Editing(id) => self.handle_edit_key(key, id),
        }

        if let Some(e) = self.list.last_persist_error() {
            self.status_message = Some(format!("Not saved: {}", e));
        }

        self.clamp_selection();
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }

            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = self.selected.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }

            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(id) = self.selected_id() {
                    self.list.toggle(id);
                }
            }
            KeyCode::Char('n') => {
                self.input_mode = InputMode::NewTodo(String::new());
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    if self.list.start_edit(id) {
                        self.input_mode = InputMode::Editing(id);
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    if let Some(removed) = self.list.remove(id) {
                        self.status_message = Some(format!("Removed: {}", removed.title));
                    }
                }
            }
            KeyCode::Char('a') => {
                // Check everything unless everything is already checked
                let checked = self.list.remaining_count() > 0;
                self.list.toggle_all(checked);
            }
            KeyCode::Char('C') => {
                let removed = self.list.clear_completed();
                self.status_message = Some(format!("Cleared {} completed", removed));
            }

            KeyCode::Char('1') => self.list.set_filter(Filter::All),
            KeyCode::Char('2') => self.list.set_filter(Filter::Active),
            KeyCode::Char('3') => self.list.set_filter(Filter::Completed),
            KeyCode::Tab => {
                let next = match self.list.filter() {
                    Filter::All => Filter::Active,
                    Filter::Active => Filter::Completed,
                    Filter::Completed => Filter::All,
                };
                self.list.set_filter(next);
            }

            KeyCode::Char('?') => {
                self.status_message = Some(HELP.to_string());
            }

            _ => {}
        }
    }

    fn handle_new_todo_key(&mut self, key: KeyEvent, mut text: String) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                // The input is cleared only when the add went through
                if self.list.add(&text).is_some() {
                    text.clear();
                    self.selected = 0;
                }
                self.input_mode = InputMode::NewTodo(text);
            }
            KeyCode::Backspace => {
                text.pop();
                self.input_mode = InputMode::NewTodo(text);
            }
            KeyCode::Char(c) => {
                text.push(c);
                self.input_mode = InputMode::NewTodo(text);
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent, id: TodoId) {
        match key.code {
            KeyCode::Esc => {
                self.list.cancel_edit();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.status_message = match self.list.save_edit(id) {
                    Some(EditOutcome::Saved) => None,
                    Some(EditOutcome::Removed(todo)) => Some(format!("Removed: {}", todo.title)),
                    None => Some("Todo no longer exists".to_string()),
                };
                self.list.cancel_edit();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.list.edit_buffer_mut().pop();
            }
            KeyCode::Char(c) => {
                self.list.edit_buffer_mut().push(c);
            }
            _ => {}
        }
    }

    fn clamp_selection(&mut self) {
        let visible = self.list.filtered().count();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }
}
