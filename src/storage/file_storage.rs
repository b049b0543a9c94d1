// File storage - JSON-based persistence for the task list

use crate::models::Task;
use std::fs;
use std::path::PathBuf;

pub struct FileStorage {
    file_path: PathBuf,
}

impl FileStorage {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn file_path(&self) -> &PathBuf {
        &self.file_path
    }

    /// Load the full task list. A missing file is an empty list; anything
    /// that exists but fails to parse is an error for the caller to handle.
    pub fn load_tasks(&self) -> anyhow::Result<Vec<Task>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.file_path)?;
        let tasks: Vec<Task> = serde_json::from_str(&contents)?;

        Ok(tasks)
    }

    /// Overwrite the slot with the complete task list.
    pub fn save_tasks(&self, tasks: &[Task]) -> anyhow::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(tasks)?;
        fs::write(&self.file_path, json)?;

        Ok(())
    }

    /// Default slot location: <data dir>/tido/tasks.json
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tido")
            .join("tasks.json")
    }
}
