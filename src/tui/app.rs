//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which renders the widget, maps
//! key presses to store operations, and keeps its cursor in sync with the
//! store's current snapshot. The display never mutates state directly:
//! every intent goes through exactly one `TaskStore` operation and the
//! next frame re-reads the snapshot.

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};

use crate::dates::{format_due_relative, parse_due_input};
use crate::store::TaskStore;
use crate::tui::{
    colors::{ACCENT, DUE_SOON, OVERDUE},
    enums::{AppState, PromptKind},
    input::Prompt,
};

/// Main application state for the terminal user interface.
///
/// Owns the store and a small amount of view state (cursor position,
/// open prompt, pending confirmation). A revision counter subscribed to
/// the store tells the app when a new snapshot was installed so it can
/// re-sync the cursor against it.
pub struct App {
    state: AppState,
    store: TaskStore,
    revision: Rc<Cell<u64>>,
    seen_revision: u64,
    task_table_state: TableState,
    prompt: Option<Prompt>,
    confirm_delete: Option<u64>,
    status_message: String,
}

impl App {
    /// Create a new App around a fresh store.
    pub fn new() -> Self {
        let mut store = TaskStore::new();
        let revision = Rc::new(Cell::new(0u64));
        let bump = Rc::clone(&revision);
        store.subscribe(Box::new(move |_| bump.set(bump.get() + 1)));

        App {
            state: AppState::Tasks,
            store,
            revision,
            seen_revision: 0,
            task_table_state: TableState::default(),
            prompt: None,
            confirm_delete: None,
            status_message: String::new(),
        }
    }

    /// Re-sync the task cursor after the store installed a new snapshot.
    ///
    /// Keeps the selected row in range when tasks were added or deleted
    /// and selects the first row when the list gains its first task.
    fn sync_with_store(&mut self) {
        let rev = self.revision.get();
        if rev == self.seen_revision {
            return;
        }
        self.seen_revision = rev;

        let len = self.store.active_list().map_or(0, |l| l.tasks.len());
        match self.task_table_state.selected() {
            Some(_) if len == 0 => self.task_table_state.select(None),
            Some(i) if i >= len => self.task_table_state.select(Some(len - 1)),
            None if len > 0 => self.task_table_state.select(Some(0)),
            _ => {}
        }
    }

    /// Id of the task under the cursor in the active list, if any.
    fn selected_task_id(&self) -> Option<u64> {
        let idx = self.task_table_state.selected()?;
        self.store
            .active_list()
            .and_then(|l| l.tasks.get(idx))
            .map(|t| t.id)
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Select the previous or next list tab, wrapping at the ends.
    fn switch_list(&mut self, forward: bool) {
        let snap = self.store.snapshot();
        let count = snap.lists.len();
        let current = snap
            .active_list_id
            .and_then(|id| snap.lists.iter().position(|l| l.id == id))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        let target = snap.lists[next].id;
        self.store.select_list(target);
        self.sync_with_store();
    }

    /// Handle keyboard input in the task view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_keys(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Esc | KeyCode::Char('q') => return Ok(true),

            KeyCode::Up => {
                if let Some(selected) = self.task_table_state.selected() {
                    if selected > 0 {
                        self.task_table_state.select(Some(selected - 1));
                    }
                } else if self.store.active_list().is_some_and(|l| !l.tasks.is_empty()) {
                    self.task_table_state.select(Some(0));
                }
            }
            KeyCode::Down => {
                let len = self.store.active_list().map_or(0, |l| l.tasks.len());
                if let Some(selected) = self.task_table_state.selected() {
                    if selected + 1 < len {
                        self.task_table_state.select(Some(selected + 1));
                    }
                } else if len > 0 {
                    self.task_table_state.select(Some(0));
                }
            }
            KeyCode::Left => self.switch_list(false),
            KeyCode::Right | KeyCode::Tab => self.switch_list(true),

            KeyCode::Char('n') => {
                self.prompt = Some(Prompt::new(PromptKind::NewList, "New list name"));
                self.state = AppState::Prompt;
            }
            KeyCode::Char('a') => {
                if let Some(list) = self.store.active_list() {
                    self.prompt = Some(Prompt::new(
                        PromptKind::NewTask { list_id: list.id },
                        "New task",
                    ));
                    self.state = AppState::Prompt;
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('c') | KeyCode::Enter => {
                if let Some(task_id) = self.selected_task_id() {
                    self.store.toggle_task_completion(task_id);
                    self.sync_with_store();
                }
            }
            KeyCode::Char('e') => {
                if let Some(task_id) = self.selected_task_id() {
                    let text = self
                        .store
                        .snapshot()
                        .task(task_id)
                        .map(|t| t.text.clone())
                        .unwrap_or_default();
                    self.prompt = Some(Prompt::with_value(
                        PromptKind::EditTask { task_id },
                        "Edit task",
                        &text,
                    ));
                    self.state = AppState::Prompt;
                }
            }
            KeyCode::Char('u') => {
                if let Some(task_id) = self.selected_task_id() {
                    let current = self
                        .store
                        .snapshot()
                        .task(task_id)
                        .and_then(|t| t.due)
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default();
                    self.prompt = Some(Prompt::with_value(
                        PromptKind::DueDate { task_id },
                        "Due date (e.g. tomorrow, fri, in 3d; blank clears)",
                        &current,
                    ));
                    self.state = AppState::Prompt;
                }
            }
            KeyCode::Char('d') => {
                if let Some(task_id) = self.selected_task_id() {
                    self.confirm_delete = Some(task_id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('h') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input while a prompt is open.
    fn handle_prompt_keys(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }
        let Some(prompt) = self.prompt.as_mut() else {
            self.state = AppState::Tasks;
            return Ok(false);
        };

        match key {
            KeyCode::Esc => {
                self.prompt = None;
                self.state = AppState::Tasks;
            }
            KeyCode::Enter => {
                let kind = prompt.kind;
                let value = prompt.value.clone();
                if self.submit_prompt(kind, &value) {
                    self.prompt = None;
                    self.state = AppState::Tasks;
                    self.sync_with_store();
                }
            }
            KeyCode::Backspace => prompt.handle_backspace(),
            KeyCode::Delete => prompt.handle_delete(),
            KeyCode::Left => prompt.move_cursor_left(),
            KeyCode::Right => prompt.move_cursor_right(),
            KeyCode::Char(c) => prompt.handle_char(c),
            _ => {}
        }
        Ok(false)
    }

    /// Apply a submitted prompt value to the store.
    ///
    /// Returns false when the prompt should stay open (unparseable date).
    fn submit_prompt(&mut self, kind: PromptKind, value: &str) -> bool {
        match kind {
            PromptKind::NewList => {
                self.store.add_list(value);
                if value.trim().is_empty() {
                    self.set_status_message("List name cannot be empty".to_string());
                }
            }
            PromptKind::NewTask { list_id } => {
                self.store.add_task(list_id, value);
                if value.trim().is_empty() {
                    self.set_status_message("Task text cannot be empty".to_string());
                }
            }
            PromptKind::EditTask { task_id } => {
                self.store.edit_task(task_id, value);
            }
            PromptKind::DueDate { task_id } => {
                if value.trim().is_empty() {
                    self.store.set_task_due_date(task_id, None);
                    self.set_status_message("Due date cleared".to_string());
                } else {
                    match parse_due_input(value) {
                        Some(date) => {
                            self.store.set_task_due_date(task_id, Some(date));
                            self.set_status_message(format!("Due {}", date.format("%Y-%m-%d")));
                        }
                        None => {
                            self.set_status_message(format!("Unrecognised date '{value}'"));
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// Handle keyboard input in the delete confirmation dialog.
    fn handle_confirm_keys(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(task_id) = self.confirm_delete.take() {
                    self.store.delete_task(task_id);
                    self.sync_with_store();
                    self.set_status_message("Task deleted".to_string());
                }
                self.state = AppState::Tasks;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.confirm_delete = None;
                self.state = AppState::Tasks;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_help_keys(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => {
                self.state = AppState::Tasks;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Poll for and handle keyboard events based on current application state.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if self.state == AppState::Tasks {
                    self.status_message.clear();
                }
                let should_quit = match self.state {
                    AppState::Tasks => self.handle_task_keys(key.code, key.modifiers)?,
                    AppState::Prompt => self.handle_prompt_keys(key.code, key.modifiers)?,
                    AppState::Confirm => self.handle_confirm_keys(key.code, key.modifiers)?,
                    AppState::Help => self.handle_help_keys(key.code, key.modifiers)?,
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Render the list tab bar.
    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let snap = self.store.snapshot();
        let titles: Vec<Line> = snap
            .lists
            .iter()
            .map(|l| Line::from(format!("{} ({})", l.name, l.tasks.len())))
            .collect();
        let selected = snap
            .active_list_id
            .and_then(|id| snap.lists.iter().position(|l| l.id == id))
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .block(Block::default().borders(Borders::ALL).title("Lists"))
            .highlight_style(
                Style::default()
                    .fg(Color::White)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    /// Render the task table for the active list.
    fn render_tasks(&mut self, f: &mut Frame, area: Rect) {
        let today = Local::now().date_naive();
        let snap = self.store.snapshot();
        let Some(list) = snap.active_list() else {
            let empty = Paragraph::new("No list selected")
                .block(Block::default().borders(Borders::ALL).title("Tasks"));
            f.render_widget(empty, area);
            return;
        };

        let header = Row::new(
            ["", "Due", "Task"].iter().map(|h| {
                ratatui::widgets::Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))
            }),
        )
        .style(Style::default().bg(ACCENT).fg(Color::White))
        .height(1);

        let rows: Vec<Row> = list
            .tasks
            .iter()
            .map(|task| {
                let mark = if task.completed { "[x]" } else { "[ ]" };
                let due_str = format_due_relative(task.due, today);

                let style = if task.completed {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    match task.due {
                        Some(d) if d < today => Style::default().fg(OVERDUE),
                        Some(d) if (d - today).num_days() <= 1 => Style::default().fg(DUE_SOON),
                        _ => Style::default().fg(Color::White),
                    }
                };

                Row::new(vec![
                    ratatui::widgets::Cell::from(mark),
                    ratatui::widgets::Cell::from(due_str),
                    ratatui::widgets::Cell::from(task.text.clone()),
                ])
                .style(style)
            })
            .collect();

        let done = list.tasks.iter().filter(|t| t.completed).count();
        let widths = [
            Constraint::Length(3),  // checkbox
            Constraint::Length(10), // due
            Constraint::Min(25),    // text
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "{} ({}/{} done)",
                list.name,
                done,
                list.tasks.len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.task_table_state);
    }

    /// Render the open prompt as a centered popup over the task view.
    fn render_prompt(&mut self, f: &mut Frame, area: Rect) {
        let Some(prompt) = self.prompt.clone() else {
            return;
        };
        let popup = centered_rect(60, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(prompt.label.clone())
            .border_style(Style::default().fg(ACCENT));
        let inner = block.inner(popup);
        let input = Paragraph::new(prompt.value.clone()).block(block);
        f.render_widget(input, popup);

        let cursor_cols = prompt.value[..prompt.cursor].chars().count() as u16;
        f.set_cursor_position(Position::new(inner.x + cursor_cols, inner.y));
    }

    /// Render the delete confirmation dialog.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let text = match self.confirm_delete.and_then(|id| self.store.snapshot().task(id)) {
            Some(task) => format!("Delete '{}'? (y/n)", task.text),
            None => "Delete task? (y/n)".to_string(),
        };
        let popup = centered_rect(50, area);
        f.render_widget(Clear, popup);
        let dialog = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Confirm")
                    .border_style(Style::default().fg(OVERDUE)),
            );
        f.render_widget(dialog, popup);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("  Left/Right, Tab   switch list"),
            Line::from("  Up/Down           move task cursor"),
            Line::from("  n                 new list"),
            Line::from("  a                 new task in the active list"),
            Line::from("  Space, c, Enter   toggle completion"),
            Line::from("  e                 edit task text"),
            Line::from("  u                 set due date (blank clears)"),
            Line::from("  d                 delete task (asks first)"),
            Line::from("  h                 this help"),
            Line::from("  q, Esc            quit"),
            Line::from(""),
            Line::from("State lives in memory for this session only."),
        ];
        let help = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Tasks => {
                    "a add task | n new list | Space toggle | e edit | u due | d delete | h help"
                        .to_string()
                }
                AppState::Prompt => "Enter to submit, Esc to cancel".to_string(),
                AppState::Confirm => "y to delete, n to keep".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(ACCENT).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        match self.state {
            AppState::Help => {
                self.render_tabs(f, chunks[0]);
                self.render_help(f, chunks[1]);
            }
            AppState::Prompt => {
                self.render_tabs(f, chunks[0]);
                self.render_tasks(f, chunks[1]);
                self.render_prompt(f, chunks[1]);
            }
            AppState::Confirm => {
                self.render_tabs(f, chunks[0]);
                self.render_tasks(f, chunks[1]);
                self.render_confirm(f, chunks[1]);
            }
            AppState::Tasks => {
                self.render_tabs(f, chunks[0]);
                self.render_tasks(f, chunks[1]);
            }
        }

        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.sync_with_store();
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        App::new()
    }
}

/// A centered rect of the given percentage width, three rows tall.
fn centered_rect(percent_x: u16, area: Rect) -> Rect {
    let popup_width = area.width * percent_x / 100;
    let popup_height = 3.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    }
}
