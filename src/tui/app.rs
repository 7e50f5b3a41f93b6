//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the `TaskStore` for the
//! session, translates key presses into store intents, and renders the
//! category tabs, the filter/sort/search controls, the task table and the
//! entry form.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};

use crate::cmd::EMPTY_LIST_MESSAGE;
use crate::dates::{due_state, format_due_relative, today};
use crate::fields::{Category, SortDirection, SortField, SortSpec, StatusFilter};
use crate::store::TaskStore;
use crate::task::TaskId;
use crate::tui::{
    colors::{row_style, DARK_RED, INDIGO},
    enums::{AppState, FormField},
    task_form::TaskForm,
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    store: TaskStore,
    table_state: TableState,
    task_form: TaskForm,
    status_message: String,
    search_active: bool,
    pending_delete: Option<TaskId>,
}

impl App {
    /// Create an App around an already hydrated store.
    pub fn new(store: TaskStore) -> Self {
        let category = store.view_state().active_category;
        let mut app = App {
            state: AppState::TaskList,
            store,
            table_state: TableState::default(),
            task_form: TaskForm::new(category),
            status_message: String::new(),
            search_active: false,
            pending_delete: None,
        };
        app.sync_selection(None);
        app
    }

    /// Id of the highlighted row.
    fn selected_id(&self) -> Option<TaskId> {
        self.table_state
            .selected()
            .and_then(|idx| self.store.visible_ids().get(idx))
            .copied()
    }

    /// Re-point the highlight after the derived list changed, following
    /// `keep` when it is still visible.
    fn sync_selection(&mut self, keep: Option<TaskId>) {
        let visible = self.store.visible_ids();
        if visible.is_empty() {
            self.table_state.select(None);
            return;
        }
        let idx = keep
            .and_then(|id| visible.iter().position(|&v| v == id))
            .unwrap_or_else(|| self.table_state.selected().unwrap_or(0).min(visible.len() - 1));
        self.table_state.select(Some(idx));
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn switch_category(&mut self, category: Category) {
        self.search_active = false;
        self.store.set_active_category(category);
        self.table_state.select(None);
        self.sync_selection(None);
    }

    fn select_sort(&mut self, direction: SortDirection) {
        let keep = self.selected_id();
        self.store.set_sort(Some(SortField::DueDate), Some(direction));
        self.sync_selection(keep);
        match self.store.view_state().sort {
            Some(spec) => self.set_status_message(format!("Sorted by due date ({})", spec.direction.label())),
            None => self.set_status_message("Sorting cleared"),
        }
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.store.visible_ids().len();
        if len == 0 {
            return;
        }
        let next = match (self.table_state.selected(), down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.table_state.select(Some(next));
    }

    /// Handle keyboard input while the live search box has focus.
    fn handle_search_input(&mut self, key: KeyCode) {
        let mut text = self.store.view_state().search_text.clone();
        match key {
            KeyCode::Esc => {
                self.search_active = false;
                text.clear();
            }
            KeyCode::Enter => {
                self.search_active = false;
                let count = self.store.visible_ids().len();
                if text.trim().is_empty() {
                    self.set_status_message("Search cleared");
                } else {
                    self.set_status_message(format!("Search: '{}' ({} tasks)", text, count));
                }
                return;
            }
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(c) => text.push(c),
            _ => return,
        }
        let keep = self.selected_id();
        self.store.set_search_text(text);
        self.sync_selection(keep);
    }

    /// Handle keyboard input in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode) -> bool {
        if self.search_active {
            self.handle_search_input(key);
            return false;
        }

        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.store.view_state().search_text.is_empty() {
                    return true;
                }
                self.store.set_search_text("");
                self.sync_selection(None);
                self.set_status_message("Search cleared");
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let next = self.store.view_state().active_category.other();
                self.switch_category(next);
            }
            KeyCode::Char('1') => self.switch_category(Category::Personal),
            KeyCode::Char('2') => self.switch_category(Category::Work),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Char('a') => {
                self.task_form = TaskForm::new(self.store.view_state().active_category);
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    if self.store.begin_edit(id) {
                        if let Some(task) = self.store.get(id) {
                            self.task_form = TaskForm::from_task(task);
                            self.state = AppState::EditTask;
                        }
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.pending_delete = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('c') => {
                if let Some(id) = self.selected_id() {
                    self.store.toggle_completion(id);
                    self.sync_selection(Some(id));
                    let msg = match self.store.get(id) {
                        Some(t) if t.completed => "Marked as complete",
                        _ => "Marked as pending",
                    };
                    self.set_status_message(msg);
                }
            }
            KeyCode::Char('f') => {
                let keep = self.selected_id();
                let next = self.store.view_state().status_filter.next();
                self.store.set_status_filter(next);
                self.sync_selection(keep);
                self.set_status_message(format!("Showing {} tasks", next.label()));
            }
            KeyCode::Char('<') => self.select_sort(SortDirection::Asc),
            KeyCode::Char('>') => self.select_sort(SortDirection::Desc),
            KeyCode::Char('/') => {
                self.search_active = true;
                self.set_status_message("Type to search descriptions, Enter to keep, Esc to clear");
            }
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Handle keyboard input in the add/edit form.
    fn handle_form_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                if self.task_form.is_edit() {
                    self.store.cancel_edit();
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Home => {
                if let Some(field) = self.task_form.active_input() {
                    field.move_home();
                }
            }
            KeyCode::End => {
                if let Some(field) = self.task_form.active_input() {
                    field.move_end();
                }
            }
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    /// Validate the form and forward it to the store as an add or update.
    /// Validation failures keep the form open and leave the store untouched.
    fn submit_form(&mut self) {
        let draft = self.task_form.draft();
        let today = today();

        let result = match self.task_form.editing {
            Some(id) => match self.store.get(id).cloned() {
                Some(current) => draft.apply_to(&current, today).map(|task| {
                    self.store.update(task);
                    self.sync_selection(Some(id));
                    "Task updated".to_string()
                }),
                None => {
                    // Removed while the form was open.
                    self.store.cancel_edit();
                    Ok("Task no longer exists".to_string())
                }
            },
            None => draft.validate(today).map(|new_task| {
                let category = new_task.category;
                let id = self.store.add(new_task);
                self.sync_selection(Some(id));
                if category == self.store.view_state().active_category {
                    "Task added".to_string()
                } else {
                    format!("Task added to {}", category)
                }
            }),
        };

        match result {
            Ok(msg) => {
                self.task_form.reset();
                self.state = AppState::TaskList;
                self.set_status_message(msg);
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    /// Handle keyboard input in the delete confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(id) = self.pending_delete.take() {
                    self.store.delete(id);
                    self.sync_selection(None);
                    self.set_status_message("Task deleted");
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    /// Dispatch one key press to the active screen.
    ///
    /// Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.clear_status_message();

        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key.code),
            AppState::AddTask | AppState::EditTask => self.handle_form_input(key.code),
            AppState::Confirm => self.handle_confirm_input(key.code),
            AppState::Help => self.state = AppState::TaskList,
        }
        false
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(self.handle_key(key));
            }
        }
        Ok(false)
    }

    /// Render the header with the category tabs.
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let active = self.store.view_state().active_category;
        let titles: Vec<Line> = Category::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| Line::from(format!(" {} {} ", i + 1, c.label())))
            .collect();
        let selected = Category::ALL.iter().position(|&c| c == active).unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        " EFFICIENT TASK MANAGER ",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
            )
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::White)
                    .bg(INDIGO)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("|");
        f.render_widget(tabs, area);
    }

    /// Render the search box and the status/sort selectors.
    fn render_controls(&self, f: &mut Frame, area: Rect) {
        let view = self.store.view_state();
        let on = Style::default().fg(Color::White).bg(INDIGO).add_modifier(Modifier::BOLD);
        let off = Style::default().fg(Color::Gray);

        let mut spans = vec![Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD))];
        let search_style = if self.search_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        if view.search_text.is_empty() && !self.search_active {
            spans.push(Span::styled("(press /)", off));
        } else {
            spans.push(Span::styled(view.search_text.clone(), search_style));
        }
        if self.search_active {
            spans.push(Span::styled("▏", search_style));
        }

        spans.push(Span::styled("   Status: ", Style::default().add_modifier(Modifier::BOLD)));
        for filter in StatusFilter::ALL {
            let style = if view.status_filter == filter { on } else { off };
            spans.push(Span::styled(format!(" {} ", filter.label()), style));
            spans.push(Span::raw(" "));
        }

        spans.push(Span::styled("  Sort by Due Date: ", Style::default().add_modifier(Modifier::BOLD)));
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let style = if view.sort == Some(SortSpec::due_date(direction)) { on } else { off };
            spans.push(Span::styled(format!(" {} ", direction.label()), style));
            spans.push(Span::raw(" "));
        }

        let controls = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        f.render_widget(controls, area);
    }

    /// Render the derived task list, or the empty-list message.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = today();
        let category = self.store.view_state().active_category;
        let in_category = self
            .store
            .tasks()
            .iter()
            .filter(|t| t.category == category)
            .count();
        let tasks = self.store.visible_tasks();
        let block = Block::default().borders(Borders::ALL).title(format!(
            "{} Tasks ({}/{}) - Press 'h' for help",
            category,
            tasks.len(),
            in_category
        ));

        if tasks.is_empty() {
            let empty = Paragraph::new(vec![Line::from(""), Line::from(EMPTY_LIST_MESSAGE)])
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let header = Row::new(
            ["Description", "Due Date", "When", "Status"]
                .iter()
                .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(INDIGO).fg(Color::White))
        .height(1);

        let rows: Vec<Row> = tasks
            .iter()
            .map(|task| {
                let style = row_style(due_state(task.due_date, task.completed, today));
                Row::new(vec![
                    Cell::from(task.description.clone()),
                    Cell::from(task.due_date.to_string()),
                    Cell::from(format_due_relative(task.due_date, today)),
                    Cell::from(if task.completed { "Completed" } else { "Pending" }),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Min(30),    // Description
            Constraint::Length(12), // Due Date
            Constraint::Length(10), // When
            Constraint::Length(10), // Status
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    /// Render the add/edit form as a popup over the list.
    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 60, area);
        f.render_widget(Clear, area);

        let title = if self.task_form.is_edit() { "Edit Task" } else { "Add New Task" };
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Description
                Constraint::Length(3), // Category
                Constraint::Length(3), // Due Date
                Constraint::Min(1),    // Instructions
            ])
            .split(inner);

        for (i, field) in FormField::ORDER.iter().enumerate() {
            let focused = self.task_form.current_field == *field;
            let border_style = if focused {
                Style::default().fg(INDIGO).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let text = match field {
                FormField::Description => self.task_form.description.value.clone(),
                FormField::Category => format!("< {} >", self.task_form.category),
                FormField::DueDate => self.task_form.due.value.clone(),
            };
            let widget = Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(field.title())
                    .border_style(border_style),
            );
            f.render_widget(widget, chunks[i]);
        }

        let submit = if self.task_form.is_edit() { "Update Task" } else { "Add Task" };
        let cancel = if self.task_form.is_edit() { "Cancel Edit" } else { "Cancel" };
        let instructions = Paragraph::new(vec![
            Line::from(format!("Enter: {}   Esc: {}   Tab/↑↓: Next field", submit, cancel)),
            Line::from("Category: ←/→ or p/w   Due: YYYY-MM-DD, today, tomorrow, in 3d, friday"),
        ])
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
        f.render_widget(instructions, chunks[3]);

        let (cursor, chunk) = match self.task_form.current_field {
            FormField::Description => (Some(self.task_form.description.cursor), chunks[0]),
            FormField::DueDate => (Some(self.task_form.due.cursor), chunks[2]),
            FormField::Category => (None, chunks[1]),
        };
        if let Some(cursor) = cursor {
            f.set_cursor_position(field_cursor(chunk, cursor));
        }
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(vec![Span::styled("Efficient Task Manager Help", bold)]),
            Line::from(""),
            Line::from(vec![Span::styled("Task List:", bold)]),
            Line::from("  Tab / 1 / 2    Switch between Personal and Work"),
            Line::from("  ↑/k, ↓/j       Move selection"),
            Line::from("  a              Add new task"),
            Line::from("  e              Edit selected task"),
            Line::from("  d              Delete selected task"),
            Line::from("  Space / c      Toggle completion"),
            Line::from("  f              Cycle status filter (All → Pending → Completed)"),
            Line::from("  < / >          Sort by due date Asc / Desc (press again to clear)"),
            Line::from("  /              Search descriptions"),
            Line::from("  h / F1         Show this help"),
            Line::from("  q / Esc        Quit"),
            Line::from(""),
            Line::from(vec![Span::styled("Form:", bold)]),
            Line::from("  Tab / ↑↓       Move between fields"),
            Line::from("  ← / →          Move cursor, or change category"),
            Line::from("  Enter          Save task"),
            Line::from("  Esc            Cancel"),
            Line::from(""),
            Line::from(vec![Span::styled("Row colours:", bold)]),
            Line::from("  green  completed    red  overdue    yellow  due within 2 days"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let description = self
            .pending_delete
            .and_then(|id| self.store.get(id))
            .map(|t| t.description.clone())
            .unwrap_or_default();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(description),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.search_active {
            format!(
                "Search: {} (Esc to clear, Enter to keep)",
                self.store.view_state().search_text
            )
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "Tasks: {} | a add  e edit  d delete  space toggle  f filter  </> sort  / search  h help",
                    self.store.visible_ids().len()
                ),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(INDIGO).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Length(3), // Controls
                Constraint::Min(0),    // Body
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_controls(f, chunks[1]);

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[2]),
            AppState::AddTask | AppState::EditTask => {
                self.render_task_list(f, chunks[2]);
                self.render_task_form(f, chunks[2]);
            }
            AppState::Help => self.render_help(f, chunks[2]),
            AppState::Confirm => {
                self.render_task_list(f, chunks[2]);
                self.render_confirm(f, chunks[2]);
            }
        }

        self.render_status_bar(f, chunks[3]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Screen position for a text cursor inside a bordered one-line field,
/// pinned to the last inner cell once the text outgrows the field.
fn field_cursor(field: Rect, cursor: usize) -> (u16, u16) {
    let last = field.width.saturating_sub(3);
    let offset = u16::try_from(cursor).unwrap_or(u16::MAX).min(last);
    (field.x + 1 + offset, field.y + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::task::NewTask;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(TaskStore::open(Box::new(MemoryStore::new())))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn seed(app: &mut App, desc: &str, category: Category, due: (u32, u32), completed: bool) -> TaskId {
        let due = NaiveDate::from_ymd_opt(2030, due.0, due.1).unwrap();
        let id = app.store.add(NewTask::new(desc, category, due));
        if completed {
            app.store.toggle_completion(id);
        }
        app.sync_selection(None);
        id
    }

    fn visible(app: &App) -> Vec<String> {
        app.store
            .visible_tasks()
            .iter()
            .map(|t| t.description.clone())
            .collect()
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_add_task_through_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::AddTask);
        type_text(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2030-01-01");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::TaskList);
        assert_eq!(visible(&app), ["Buy milk"]);
        assert_eq!(app.status_message, "Task added");
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_form_rejects_missing_fields() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::AddTask);
        assert_eq!(app.status_message, "Description is required.");

        type_text(&mut app, "No date");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status_message, "Due date is required.");
        assert!(app.store.tasks().is_empty());
    }

    #[test]
    fn test_add_to_other_category_keeps_current_tab() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Standup");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "today");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.status_message, "Task added to Work");
        assert!(visible(&app).is_empty());
        press(&mut app, KeyCode::Tab);
        assert_eq!(visible(&app), ["Standup"]);
    }

    #[test]
    fn test_edit_selected_task() {
        let mut app = app();
        let id = seed(&mut app, "Draft", Category::Personal, (1, 5), false);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state, AppState::EditTask);
        assert_eq!(app.store.editing(), Some(id));

        for _ in 0.."Draft".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "Final");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::TaskList);
        assert_eq!(app.store.get(id).unwrap().description, "Final");
        assert_eq!(app.store.editing(), None);
    }

    #[test]
    fn test_cancel_edit_clears_edit_state() {
        let mut app = app();
        seed(&mut app, "Draft", Category::Personal, (1, 5), false);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::TaskList);
        assert_eq!(app.store.editing(), None);
        assert_eq!(visible(&app), ["Draft"]);
    }

    #[test]
    fn test_toggle_moves_completed_to_bottom() {
        let mut app = app();
        let first = seed(&mut app, "First", Category::Personal, (1, 1), false);
        seed(&mut app, "Second", Category::Personal, (1, 2), false);
        assert_eq!(app.selected_id(), Some(first));

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(visible(&app), ["Second", "First"]);
        assert_eq!(app.selected_id(), Some(first));
        assert_eq!(app.status_message, "Marked as complete");
    }

    #[test]
    fn test_filter_sort_and_search_keys() {
        let mut app = app();
        seed(&mut app, "Buy milk", Category::Personal, (1, 9), false);
        seed(&mut app, "buy bread", Category::Personal, (1, 3), false);
        seed(&mut app, "Sell car", Category::Personal, (1, 1), true);

        press(&mut app, KeyCode::Char('<'));
        assert_eq!(visible(&app), ["buy bread", "Buy milk", "Sell car"]);
        press(&mut app, KeyCode::Char('<'));
        assert_eq!(app.store.view_state().sort, None);
        assert_eq!(app.status_message, "Sorting cleared");

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.store.view_state().status_filter, StatusFilter::Pending);
        assert_eq!(visible(&app).len(), 2);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(visible(&app), ["Sell car"]);
        press(&mut app, KeyCode::Char('f'));

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "BUY");
        assert_eq!(visible(&app), ["Buy milk", "buy bread"]);
        press(&mut app, KeyCode::Enter);
        assert!(!app.search_active);
        assert_eq!(app.store.view_state().search_text, "BUY");

        press(&mut app, KeyCode::Esc);
        assert_eq!(visible(&app).len(), 3);
        assert!(!press(&mut app, KeyCode::Char('k')));
    }

    #[test]
    fn test_tab_switch_resets_view() {
        let mut app = app();
        seed(&mut app, "Home", Category::Personal, (1, 1), false);
        seed(&mut app, "Office", Category::Work, (1, 1), false);
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('>'));

        press(&mut app, KeyCode::Char('2'));
        let view = app.store.view_state();
        assert_eq!(view.active_category, Category::Work);
        assert_eq!(view.status_filter, StatusFilter::All);
        assert_eq!(view.sort, None);
        assert_eq!(visible(&app), ["Office"]);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app();
        seed(&mut app, "Keep", Category::Personal, (1, 1), false);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(visible(&app), ["Keep"]);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.store.tasks().is_empty());
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_field_cursor_stays_inside_field() {
        let field = Rect::new(10, 5, 20, 3);
        assert_eq!(field_cursor(field, 0), (11, 6));
        assert_eq!(field_cursor(field, 4), (15, 6));
        assert_eq!(field_cursor(field, 17), (28, 6));
        assert_eq!(field_cursor(field, 500), (28, 6));
        assert_eq!(field_cursor(field, 70_000), (28, 6));
    }

    #[test]
    fn test_long_description_cursor_renders_in_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, &"x".repeat(300));
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let pos = terminal.get_cursor_position().unwrap();
        let popup = centered_rect(60, 60, Rect::new(0, 6, 120, 23));
        assert!(pos.x < popup.x + popup.width - 1);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('q')));
        let mut app2 = self::app();
        assert!(app2.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_render_empty_message_and_rows() {
        let mut app = app();
        let empty = screen(&mut app);
        assert!(empty.contains(EMPTY_LIST_MESSAGE));
        assert!(empty.contains("Personal Tasks (0/0)"));

        seed(&mut app, "Water plants", Category::Personal, (6, 1), false);
        let filled = screen(&mut app);
        assert!(filled.contains("Water plants"));
        assert!(filled.contains("2030-06-01"));
        assert!(!filled.contains(EMPTY_LIST_MESSAGE));

        press(&mut app, KeyCode::Char('a'));
        assert!(screen(&mut app).contains("Add New Task"));
    }
}
