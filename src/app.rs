// App module - View-session state on top of the task list store
// The store owns the task data; this struct owns everything the terminal
// session needs around it: input mode, tab, selection, and the popups.

use crate::event;
use crate::store::{Filter, TaskListStore};
use chrono::NaiveDate;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::Stdout;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    EditingText,
    EditingDate,
    EditingPriority,
    DeletePanel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tab {
    Tasks,
    Stats,
}

impl Tab {
    pub fn next(&self) -> Self {
        match self {
            Tab::Tasks => Tab::Stats,
            Tab::Stats => Tab::Tasks,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Tab::Tasks => Tab::Stats,
            Tab::Stats => Tab::Tasks,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub store: TaskListStore,
    pub input_mode: InputMode,
    pub selected_tab: Tab,
    pub selected_index: Option<usize>,
    pub show_new_task_panel: bool,
    pub show_delete_panel: bool,
    pub delete_panel_yes_selected: bool,
    pub deleting_task_id: Option<i64>,
}

impl App {
    pub fn new(store: TaskListStore) -> Self {
        let selected_index = if store.visible_tasks().is_empty() {
            None
        } else {
            Some(0)
        };

        Self {
            should_quit: false,
            store,
            input_mode: InputMode::Normal,
            selected_tab: Tab::Tasks,
            selected_index,
            show_new_task_panel: false,
            show_delete_panel: false,
            delete_panel_yes_selected: true,
            deleting_task_id: None,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        loop {
            terminal.draw(|frame| crate::ui::render(frame, self))?;

            if let Some(Event::Key(key)) = event::next_event(event::TICK_RATE)? {
                self.handle_key_event(key);
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    pub fn next_tab(&mut self) {
        self.selected_tab = self.selected_tab.next();
    }

    pub fn previous_tab(&mut self) {
        self.selected_tab = self.selected_tab.previous();
    }

    pub fn selected_task_id(&self) -> Option<i64> {
        self.selected_index
            .and_then(|i| self.store.visible_tasks().get(i).map(|t| t.id))
    }

    pub fn select_previous_task(&mut self) {
        let len = self.store.visible_tasks().len();
        if len == 0 {
            self.selected_index = None;
            return;
        }

        self.selected_index = Some(match self.selected_index {
            Some(i) if i > 0 => i - 1,
            Some(_) => len - 1,
            None => 0,
        });
    }

    pub fn select_next_task(&mut self) {
        let len = self.store.visible_tasks().len();
        if len == 0 {
            self.selected_index = None;
            return;
        }

        self.selected_index = Some(match self.selected_index {
            Some(i) if i < len - 1 => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    // Mutations can shrink the visible list, so the cursor has to follow.
    fn clamp_selection(&mut self) {
        let len = self.store.visible_tasks().len();
        self.selected_index = if len == 0 {
            None
        } else {
            Some(self.selected_index.unwrap_or(0).min(len - 1))
        };
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.store.set_filter(filter);
        self.clamp_selection();
    }

    pub fn toggle_selected_task(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.store.toggle_task(id);
            self.clamp_selection();
        }
    }

    pub fn clear_completed(&mut self) {
        self.store.clear_completed();
        self.clamp_selection();
    }

    pub fn open_new_task_panel(&mut self) {
        self.show_new_task_panel = true;
        self.input_mode = InputMode::EditingText;
        self.store.reset_drafts();
    }

    pub fn close_new_task_panel(&mut self) {
        self.show_new_task_panel = false;
        self.input_mode = InputMode::Normal;
        self.store.reset_drafts();
    }

    /// Hand the drafts to the store. A date the user typed but that doesn't
    /// parse as YYYY-MM-DD is dropped rather than persisted half-formed; the
    /// store itself rejects blank text, so submitting an empty panel just
    /// closes it.
    pub fn submit_new_task(&mut self) {
        let text = self.store.draft_text.clone();
        let due = self.store.draft_due_date.trim().to_string();
        let due_valid = NaiveDate::parse_from_str(&due, "%Y-%m-%d").is_ok();
        let priority = self.store.draft_priority;

        self.store
            .add_task(&text, due_valid.then_some(due.as_str()), Some(priority));

        self.show_new_task_panel = false;
        self.input_mode = InputMode::Normal;
        self.store.reset_drafts();

        // Put the cursor on the newest visible task.
        let len = self.store.visible_tasks().len();
        self.selected_index = if len == 0 { None } else { Some(len - 1) };
    }

    pub fn open_delete_panel(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.show_delete_panel = true;
            self.deleting_task_id = Some(id);
            self.delete_panel_yes_selected = true;
            self.input_mode = InputMode::DeletePanel;
        }
    }

    pub fn close_delete_panel(&mut self) {
        self.show_delete_panel = false;
        self.deleting_task_id = None;
        self.delete_panel_yes_selected = true;
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_delete_button(&mut self) {
        self.delete_panel_yes_selected = !self.delete_panel_yes_selected;
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.deleting_task_id {
            self.store.delete_task(id);
            self.clamp_selection();
        }
        self.close_delete_panel();
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('+') => self.open_new_task_panel(),
                KeyCode::Left => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        self.previous_tab();
                    } else if self.selected_tab == Tab::Tasks {
                        self.set_filter(self.store.filter().previous());
                    }
                }
                KeyCode::Right => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        self.next_tab();
                    } else if self.selected_tab == Tab::Tasks {
                        self.set_filter(self.store.filter().next());
                    }
                }
                KeyCode::Char('1') => self.set_filter(Filter::All),
                KeyCode::Char('2') => self.set_filter(Filter::Pending),
                KeyCode::Char('3') => self.set_filter(Filter::Completed),
                KeyCode::Up => {
                    if self.selected_tab == Tab::Tasks {
                        self.select_previous_task();
                    }
                }
                KeyCode::Down => {
                    if self.selected_tab == Tab::Tasks {
                        self.select_next_task();
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if self.selected_tab == Tab::Tasks {
                        self.toggle_selected_task();
                    }
                }
                KeyCode::Char('-') => {
                    if self.selected_tab == Tab::Tasks {
                        self.open_delete_panel();
                    }
                }
                KeyCode::Char('c') => self.clear_completed(),
                _ => {}
            },
            InputMode::EditingText => match key.code {
                KeyCode::Char(c) => {
                    self.store.draft_text.push(c);
                }
                KeyCode::Backspace => {
                    self.store.draft_text.pop();
                }
                KeyCode::Tab => {
                    self.input_mode = InputMode::EditingDate;
                }
                KeyCode::Enter => self.submit_new_task(),
                KeyCode::Esc => self.close_new_task_panel(),
                _ => {}
            },
            InputMode::EditingDate => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                    self.store.draft_due_date.push(c);
                }
                KeyCode::Backspace => {
                    self.store.draft_due_date.pop();
                }
                KeyCode::Tab => {
                    self.input_mode = InputMode::EditingPriority;
                }
                KeyCode::Enter => self.submit_new_task(),
                KeyCode::Esc => self.close_new_task_panel(),
                _ => {}
            },
            InputMode::EditingPriority => match key.code {
                KeyCode::Left | KeyCode::Up => {
                    self.store.draft_priority = self.store.draft_priority.previous();
                }
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => {
                    self.store.draft_priority = self.store.draft_priority.next();
                }
                KeyCode::Tab => {
                    self.input_mode = InputMode::EditingText;
                }
                KeyCode::Enter => self.submit_new_task(),
                KeyCode::Esc => self.close_new_task_panel(),
                _ => {}
            },
            InputMode::DeletePanel => match key.code {
                KeyCode::Tab | KeyCode::Left | KeyCode::Right => self.toggle_delete_button(),
                KeyCode::Enter => {
                    if self.delete_panel_yes_selected {
                        self.confirm_delete();
                    } else {
                        self.close_delete_panel();
                    }
                }
                KeyCode::Esc => self.close_delete_panel(),
                _ => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::storage::FileStorage;
    use tempfile::TempDir;

    fn app_in(temp: &TempDir) -> App {
        App::new(TaskListStore::initialize(FileStorage::new(
            temp.path().join("tasks.json"),
        )))
    }

    #[test]
    fn toggling_under_pending_filter_moves_the_cursor() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        app.store.add_task("a", None, None);
        app.store.add_task("b", None, None);
        app.set_filter(Filter::Pending);
        app.selected_index = Some(1);

        // Completing "b" removes it from the pending view.
        app.toggle_selected_task();

        assert_eq!(app.store.visible_tasks().len(), 1);
        assert_eq!(app.selected_index, Some(0));
        assert_eq!(app.selected_task_id(), Some(app.store.tasks()[0].id));
    }

    #[test]
    fn submit_drops_an_unparseable_due_date() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        app.open_new_task_panel();
        app.store.draft_text = "call client".to_string();
        app.store.draft_due_date = "2026-13-99".to_string();
        app.store.draft_priority = Priority::High;
        app.submit_new_task();

        let task = &app.store.tasks()[0];
        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, Priority::High);
        assert!(!app.show_new_task_panel);
        assert_eq!(app.selected_index, Some(0));
    }

    #[test]
    fn submitting_a_blank_draft_only_closes_the_panel() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        app.open_new_task_panel();
        app.store.draft_text = "   ".to_string();
        app.submit_new_task();

        assert_eq!(app.store.counts().total, 0);
        assert!(!app.show_new_task_panel);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn delete_panel_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        app.store.add_task("doomed", None, None);
        app.selected_index = Some(0);

        app.open_delete_panel();
        assert_eq!(app.input_mode, InputMode::DeletePanel);

        // "No" leaves the task alone.
        app.toggle_delete_button();
        app.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.store.counts().total, 1);
        assert_eq!(app.input_mode, InputMode::Normal);

        app.open_delete_panel();
        app.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.store.counts().total, 0);
        assert_eq!(app.selected_index, None);
    }
}
