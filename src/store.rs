// Task list store - State, mutations, and the persistence mirror
//
// Every mutation rewrites the whole slot before returning; reads from the
// slot happen only in initialize(). Write failures are logged and otherwise
// ignored, the same weak guarantee the slot itself gives.

use crate::models::{Priority, Task};
use crate::storage::FileStorage;
use chrono::Local;
use log::warn;

/// Which subset of the list is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Pending => "Pending",
            Filter::Completed => "Completed",
        }
    }

    pub fn next(&self) -> Filter {
        match self {
            Filter::All => Filter::Pending,
            Filter::Pending => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }

    pub fn previous(&self) -> Filter {
        match self {
            Filter::All => Filter::Completed,
            Filter::Pending => Filter::All,
            Filter::Completed => Filter::Pending,
        }
    }
}

/// Partition counts over the full list, not the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

pub struct TaskListStore {
    tasks: Vec<Task>,
    filter: Filter,
    pub draft_text: String,
    pub draft_due_date: String,
    pub draft_priority: Priority,
    storage: FileStorage,
}

impl TaskListStore {
    /// Build the store from whatever the slot holds. A missing slot starts
    /// empty; a malformed one is logged and also starts empty.
    pub fn initialize(storage: FileStorage) -> Self {
        let tasks = storage.load_tasks().unwrap_or_else(|e| {
            warn!("failed to load saved tasks, starting empty: {e:#}");
            Vec::new()
        });

        Self {
            tasks,
            filter: Filter::default(),
            draft_text: String::new(),
            draft_due_date: String::new(),
            draft_priority: Priority::default(),
            storage,
        }
    }

    /// Append a new task. Whitespace-only text is rejected silently: nothing
    /// is created and nothing is written. On success the drafts reset.
    pub fn add_task(&mut self, text: &str, due_date: Option<&str>, priority: Option<Priority>) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let due_date = due_date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);

        let task = Task::new(
            self.next_id(),
            text.to_string(),
            due_date,
            priority.unwrap_or_default(),
        );
        self.tasks.push(task);
        self.persist();
        self.reset_drafts();
    }

    /// Flip completion on the task with this id; silently does nothing for
    /// an unknown id, but still rewrites the slot.
    pub fn toggle_task(&mut self, id: i64) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.toggle_completed();
        }
        self.persist();
    }

    /// Remove the task with this id; unknown ids are a no-op.
    pub fn delete_task(&mut self, id: i64) {
        self.tasks.retain(|t| t.id != id);
        self.persist();
    }

    /// Remove every completed task, keeping pending ones in order.
    pub fn clear_completed(&mut self) {
        self.tasks.retain(|t| !t.completed);
        self.persist();
    }

    /// Change the view filter. Touches no task state and never persists.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The subsequence matching the active filter, in insertion order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| match self.filter {
                Filter::All => true,
                Filter::Pending => !t.completed,
                Filter::Completed => t.completed,
            })
            .collect()
    }

    pub fn counts(&self) -> Counts {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Counts {
            total,
            pending: total - completed,
            completed,
        }
    }

    pub fn reset_drafts(&mut self) {
        self.draft_text.clear();
        self.draft_due_date.clear();
        self.draft_priority = Priority::default();
    }

    // Millisecond timestamp, bumped past the current maximum so two tasks
    // created in the same millisecond still get distinct ids.
    fn next_id(&self) -> i64 {
        let now = Local::now().timestamp_millis();
        match self.tasks.iter().map(|t| t.id).max() {
            Some(max) if now <= max => max + 1,
            _ => now,
        }
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save_tasks(&self.tasks) {
            warn!("failed to persist tasks: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> TaskListStore {
        TaskListStore::initialize(FileStorage::new(temp.path().join("tasks.json")))
    }

    #[test]
    fn add_task_appends_pending_task() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.add_task("Write report", None, None);

        assert_eq!(store.counts().total, 1);
        let task = &store.tasks()[0];
        assert_eq!(task.text, "Write report");
        assert!(!task.completed);
    }

    #[test]
    fn add_task_trims_text() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.add_task("  padded  ", None, None);
        assert_eq!(store.tasks()[0].text, "padded");
    }

    #[test]
    fn add_task_rejects_blank_text_without_writing() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.add_task("", None, None);
        store.add_task("   ", None, None);

        assert_eq!(store.counts().total, 0);
        // A rejected add must not touch the slot either.
        assert!(!temp.path().join("tasks.json").exists());
    }

    #[test]
    fn add_task_defaults() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.add_task("Buy milk", None, None);

        let task = &store.tasks()[0];
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
        assert!(!task.completed);
    }

    #[test]
    fn add_task_empty_due_date_is_absent() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.add_task("a", Some(""), None);
        store.add_task("b", Some("2026-09-01"), Some(Priority::High));

        assert_eq!(store.tasks()[0].due_date, None);
        assert_eq!(store.tasks()[1].due_date.as_deref(), Some("2026-09-01"));
        assert_eq!(store.tasks()[1].priority, Priority::High);
    }

    #[test]
    fn add_task_assigns_distinct_ids() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        for i in 0..5 {
            store.add_task(&format!("task {i}"), None, None);
        }

        let ids: HashSet<i64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn add_task_resets_drafts() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.draft_text = "Buy milk".to_string();
        store.draft_due_date = "2026-09-01".to_string();
        store.draft_priority = Priority::High;

        let text = store.draft_text.clone();
        let due = store.draft_due_date.clone();
        store.add_task(&text, Some(&due), Some(store.draft_priority));

        assert_eq!(store.draft_text, "");
        assert_eq!(store.draft_due_date, "");
        assert_eq!(store.draft_priority, Priority::Medium);
    }

    #[test]
    fn toggle_twice_restores_original_flag() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.add_task("flip me", None, None);
        let id = store.tasks()[0].id;

        store.toggle_task(id);
        assert!(store.tasks()[0].completed);
        store.toggle_task(id);
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn toggle_unknown_id_is_a_noop() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.add_task("stay", None, None);
        store.toggle_task(9999);

        assert!(!store.tasks()[0].completed);
        assert_eq!(store.counts().total, 1);
    }

    #[test]
    fn second_delete_is_a_noop() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.add_task("keep", None, None);
        store.add_task("remove", None, None);
        let id = store.tasks()[1].id;

        store.delete_task(id);
        assert_eq!(store.counts().total, 1);
        store.delete_task(id);
        assert_eq!(store.counts().total, 1);
        assert_eq!(store.tasks()[0].text, "keep");
    }

    #[test]
    fn clear_completed_removes_exactly_the_completed_set() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        for text in ["a", "b", "c", "d"] {
            store.add_task(text, None, None);
        }
        let id_b = store.tasks()[1].id;
        let id_d = store.tasks()[3].id;
        store.toggle_task(id_b);
        store.toggle_task(id_d);

        store.clear_completed();

        let remaining: Vec<&str> = store.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(remaining, vec!["a", "c"]);
        assert!(store.tasks().iter().all(|t| !t.completed));
    }

    #[test]
    fn clear_completed_with_nothing_completed_keeps_everything() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.add_task("a", None, None);
        store.clear_completed();
        assert_eq!(store.counts().total, 1);
    }

    #[test]
    fn mutations_round_trip_through_the_slot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");
        let mut store = TaskListStore::initialize(FileStorage::new(path.clone()));

        store.add_task("a", Some("2026-09-01"), Some(Priority::Low));
        store.add_task("b", None, None);
        let id = store.tasks()[0].id;
        store.toggle_task(id);

        let reloaded = TaskListStore::initialize(FileStorage::new(path));
        assert_eq!(reloaded.tasks(), store.tasks());
    }

    #[test]
    fn pending_and_completed_partition_all() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        for text in ["a", "b", "c"] {
            store.add_task(text, None, None);
        }
        let id = store.tasks()[1].id;
        store.toggle_task(id);

        store.set_filter(Filter::Pending);
        let pending: HashSet<i64> = store.visible_tasks().iter().map(|t| t.id).collect();
        store.set_filter(Filter::Completed);
        let completed: HashSet<i64> = store.visible_tasks().iter().map(|t| t.id).collect();
        store.set_filter(Filter::All);
        let all: HashSet<i64> = store.visible_tasks().iter().map(|t| t.id).collect();

        assert!(pending.is_disjoint(&completed));
        let union: HashSet<i64> = pending.union(&completed).copied().collect();
        assert_eq!(union, all);
    }

    #[test]
    fn visible_tasks_preserve_insertion_order() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        for text in ["first", "second", "third"] {
            store.add_task(text, None, None);
        }
        let id = store.tasks()[1].id;
        store.toggle_task(id);

        store.set_filter(Filter::Pending);
        let texts: Vec<&str> = store.visible_tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "third"]);
    }

    #[test]
    fn counts_scenario_two_tasks_one_toggled() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.add_task("A", None, None);
        store.add_task("B", None, None);
        let id_a = store.tasks()[0].id;
        store.toggle_task(id_a);

        assert_eq!(
            store.counts(),
            Counts {
                total: 2,
                pending: 1,
                completed: 1
            }
        );
    }

    #[test]
    fn initialize_adopts_partially_shaped_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");
        fs::write(&path, r#"[{"id":1,"text":"X","completed":false}]"#).unwrap();

        let store = TaskListStore::initialize(FileStorage::new(path));

        let visible = store.visible_tasks();
        assert_eq!(store.filter(), Filter::All);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].text, "X");
        assert_eq!(visible[0].priority, Priority::Medium);
    }

    #[test]
    fn initialize_recovers_from_malformed_slot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");
        fs::write(&path, "{ definitely not a task array").unwrap();

        let store = TaskListStore::initialize(FileStorage::new(path));
        assert_eq!(store.counts().total, 0);
    }

    #[test]
    fn set_filter_never_persists() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.set_filter(Filter::Completed);
        store.set_filter(Filter::All);

        assert!(!temp.path().join("tasks.json").exists());
    }
}
