//! Terminal setup and rendering

use std::io::{self, stdout, Stdout};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};

use super::app::{App, InputMode};
use crate::cli::output::items_left;
use crate::domain::Filter;
use crate::storage::SlotStore;

/// Terminal type alias
pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Terminal> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = ratatui::Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Draw the whole screen
pub fn draw<S: SlotStore>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter tabs
            Constraint::Min(5),    // Todo list
            Constraint::Length(3), // Input line
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_filters(frame, app, chunks[0]);
    draw_todos(frame, app, chunks[1]);
    draw_input(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);
}

fn draw_filters<S: SlotStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let list = app.list();
    let titles: Vec<String> = Filter::ALL
        .iter()
        .map(|f| format!("{} ({})", f, list.filtered_by(*f).count()))
        .collect();
    let selected = Filter::ALL
        .iter()
        .position(|f| *f == list.filter())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title("tasklist"))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn draw_todos<S: SlotStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let list = app.list();

    let items: Vec<ListItem> = list
        .filtered()
        .map(|todo| {
            if list.is_editing(todo.id) {
                return ListItem::new(format!("[~] {}_", list.edit_buffer()))
                    .style(Style::default().fg(Color::Yellow));
            }

            let (mark, style) = if todo.completed {
                (
                    "[x]",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                ("[ ]", Style::default())
            };
            ListItem::new(format!("{} {}", mark, todo.title)).style(style)
        })
        .collect();

    let empty = items.is_empty();
    let widget = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Todos"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !empty {
        state.select(Some(app.selected()));
    }

    frame.render_stateful_widget(widget, area, &mut state);
}

fn draw_input<S: SlotStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let (title, text, style) = match app.input_mode() {
        InputMode::NewTodo(text) => (
            "New todo (Enter to add, Esc to finish)",
            format!("{}_", text),
            Style::default().fg(Color::Green),
        ),
        InputMode::Editing(_) => (
            "Editing (Enter to save, Esc to cancel, empty deletes)",
            format!("{}_", app.list().edit_buffer()),
            Style::default().fg(Color::Yellow),
        ),
        InputMode::Normal => (
            "Press n to add a todo",
            String::new(),
            Style::default(),
        ),
    };

    let input = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(input, area);
}

fn draw_status_bar<S: SlotStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let text = match app.status_message() {
        Some(message) => message.to_string(),
        None => format!("{}  |  ? for help", items_left(app.list().remaining_count())),
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
