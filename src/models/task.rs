// Task model - Represents a single tracked task

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Task priority. Serialized as its variant name ("Low"/"Medium"/"High").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn next(&self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn previous(&self) -> Priority {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

/// A single task as it appears in the persisted slot.
///
/// Field names on the wire are camelCase (`createdAt`, `dueDate`); a missing
/// field deserializes to its default so partially-shaped records load fine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
    pub due_date: Option<String>,
    pub priority: Priority,
}

impl Task {
    pub fn new(id: i64, text: String, due_date: Option<String>, priority: Priority) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at: Local::now().format("%Y-%m-%d").to_string(),
            due_date,
            priority,
        }
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    /// Due date as a date, when it parses as YYYY-MM-DD. The slot only
    /// guarantees a string, so anything else renders as-is but never sorts
    /// into the overdue/today highlighting.
    pub fn due_date_parsed(&self) -> Option<NaiveDate> {
        self.due_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date_parsed().is_some_and(|d| d < today)
    }

    pub fn is_due_today(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date_parsed() == Some(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_defaults() {
        let task = Task::new(1, "Buy milk".to_string(), None, Priority::default());
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
        assert!(!task.created_at.is_empty());
    }

    #[test]
    fn wire_format_is_camel_case() {
        let task = Task {
            id: 42,
            text: "X".to_string(),
            completed: false,
            created_at: "2026-08-06".to_string(),
            due_date: None,
            priority: Priority::High,
        };
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"createdAt\":\"2026-08-06\""));
        assert!(json.contains("\"dueDate\":null"));
        assert!(json.contains("\"priority\":\"High\""));
    }

    #[test]
    fn partial_record_fills_defaults() {
        let task: Task = serde_json::from_str(r#"{"id":1,"text":"X","completed":false}"#).unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.text, "X");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
        assert_eq!(task.created_at, "");
    }

    #[test]
    fn round_trip_preserves_fields() {
        let task = Task {
            id: 7,
            text: "Report".to_string(),
            completed: true,
            created_at: "2026-01-02".to_string(),
            due_date: Some("2026-01-10".to_string()),
            priority: Priority::Low,
        };
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn due_date_parsing() {
        let mut task = Task::new(1, "T".to_string(), Some("2026-03-01".to_string()), Priority::Medium);
        assert_eq!(task.due_date_parsed(), NaiveDate::from_ymd_opt(2026, 3, 1));

        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert!(task.is_overdue(today));
        task.toggle_completed();
        assert!(!task.is_overdue(today));

        task.due_date = Some("not a date".to_string());
        assert_eq!(task.due_date_parsed(), None);
    }
}
