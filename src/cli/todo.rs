//! Todo CLI commands
//!
//! Each command loads the project's list, applies one manager operation
//! (which persists on its own) and reports the result.

use anyhow::{anyhow, bail, Result};

use super::output::{items_left, todo_json, Output};
use crate::domain::{EditOutcome, Filter, Todo, TodoId, TodoList};
use crate::storage::{Project, SlotStore};

/// Tells the user when a change stayed in memory only
fn warn_if_unsaved<S: SlotStore>(output: &Output, list: &TodoList<S>) {
    if let Some(e) = list.last_persist_error() {
        output.warning(&format!("Changes were not saved: {}", e));
    }
}

pub fn add_todo(output: &Output, title: &str) -> Result<()> {
    let project = Project::open_current()?;
    let mut list = project.todo_list();

    let Some(id) = list.add(title) else {
        output.verbose_ctx("add", "Ignoring blank title");
        if output.is_json() {
            output.data(&serde_json::json!({ "added": false }));
        }
        return Ok(());
    };
    warn_if_unsaved(output, &list);

    let todo = list
        .get(id)
        .ok_or_else(|| anyhow!("Todo not found: {}", id))?;

    if output.is_json() {
        output.data(&todo_json(todo));
    } else {
        output.success(&format!("Added todo: {} - {}", todo.id, todo.title));
    }

    Ok(())
}

pub fn list_todos(output: &Output, filter: Option<Filter>) -> Result<()> {
    let project = Project::open_current()?;
    let mut list = project.todo_list();

    if let Some(filter) = filter {
        list.set_filter(filter);
    }
    output.verbose_ctx("list", &format!("Listing {} todos", list.filter()));

    let todos: Vec<&Todo> = list.filtered().collect();

    if output.is_json() {
        output.data(&serde_json::json!({
            "filter": list.filter(),
            "todos": todos.iter().map(|t| todo_json(t)).collect::<Vec<_>>(),
            "remaining": list.remaining_count(),
        }));
        return Ok(());
    }

    if todos.is_empty() {
        match list.filter() {
            Filter::All => println!("No todos"),
            filter => println!("No {} todos", filter),
        }
    } else {
        println!("{:<15} {:<4} TITLE", "ID", "DONE");
        println!("{}", "-".repeat(60));

        for todo in &todos {
            let mark = if todo.completed { "[x]" } else { "[ ]" };
            println!("{:<15} {:<4} {}", todo.id, mark, todo.title);
        }
    }

    println!();
    println!("{}", items_left(list.remaining_count()));

    Ok(())
}

pub fn toggle_todo(output: &Output, id: TodoId) -> Result<()> {
    let project = Project::open_current()?;
    let mut list = project.todo_list();

    let completed = list
        .toggle(id)
        .ok_or_else(|| anyhow!("Todo not found: {}", id))?;
    warn_if_unsaved(output, &list);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.value(),
            "completed": completed,
        }));
    } else if completed {
        output.success(&format!("Completed todo: {}", id));
    } else {
        output.success(&format!("Reopened todo: {}", id));
    }

    Ok(())
}

pub fn remove_todo(output: &Output, id: TodoId) -> Result<()> {
    let project = Project::open_current()?;
    let mut list = project.todo_list();

    let removed = list
        .remove(id)
        .ok_or_else(|| anyhow!("Todo not found: {}", id))?;
    warn_if_unsaved(output, &list);

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": todo_json(&removed),
        }));
    } else {
        output.success(&format!("Removed todo: {} - {}", removed.id, removed.title));
    }

    Ok(())
}

/// Retitles a todo; a blank title deletes it
pub fn edit_todo(output: &Output, id: TodoId, title: &str) -> Result<()> {
    let project = Project::open_current()?;
    let mut list = project.todo_list();

    if !list.start_edit(id) {
        bail!("Todo not found: {}", id);
    }
    list.set_edit_buffer(title);

    let outcome = list.save_edit(id);
    warn_if_unsaved(output, &list);

    match outcome {
        Some(EditOutcome::Saved) => {
            let todo = list
                .get(id)
                .ok_or_else(|| anyhow!("Todo not found: {}", id))?;
            if output.is_json() {
                output.data(&todo_json(todo));
            } else {
                output.success(&format!("Updated todo: {} - {}", todo.id, todo.title));
            }
        }
        Some(EditOutcome::Removed(removed)) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "removed": todo_json(&removed),
                }));
            } else {
                output.success(&format!(
                    "Removed todo: {} - {} (title was empty)",
                    removed.id, removed.title
                ));
            }
        }
        None => bail!("Todo not found: {}", id),
    }

    Ok(())
}

pub fn clear_completed(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let mut list = project.todo_list();

    let removed = list.clear_completed();
    warn_if_unsaved(output, &list);

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": removed,
            "remaining": list.len(),
        }));
    } else {
        output.success(&format!(
            "Cleared {} completed todo{}",
            removed,
            if removed == 1 { "" } else { "s" }
        ));
    }

    Ok(())
}

pub fn toggle_all(output: &Output, checked: bool) -> Result<()> {
    let project = Project::open_current()?;
    let mut list = project.todo_list();

    list.toggle_all(checked);
    warn_if_unsaved(output, &list);

    if output.is_json() {
        output.data(&serde_json::json!({
            "completed": checked,
            "count": list.len(),
        }));
    } else {
        let state = if checked { "completed" } else { "active" };
        output.success(&format!("Marked {} todos as {}", list.len(), state));
    }

    Ok(())
}

pub fn count(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let list = project.todo_list();

    if output.is_json() {
        output.data(&serde_json::json!({
            "remaining": list.remaining_count(),
            "completed": list.completed_count(),
            "total": list.len(),
        }));
    } else {
        println!("{}", items_left(list.remaining_count()));
    }

    Ok(())
}
