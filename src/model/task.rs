use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Priority given to tasks created without an explicit one
pub const DEFAULT_PRIORITY: i64 = 3;

/// Task lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Cancelled,
    Paused,
}

impl TaskStatus {
    /// Order used when cycling status in the TUI
    pub const CYCLE: [TaskStatus; 5] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Paused,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::Paused => "paused",
        }
    }

    /// Step through [`TaskStatus::CYCLE`], wrapping at both ends.
    pub fn cycle(self, forward: bool) -> TaskStatus {
        let len = Self::CYCLE.len();
        let current = Self::CYCLE.iter().position(|s| *s == self).unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        Self::CYCLE[next]
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status '{0}' (expected todo, in-progress, done, cancelled or paused)")]
pub struct InvalidStatus(pub String);

impl FromStr for TaskStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "cancelled" => Ok(TaskStatus::Cancelled),
            "paused" => Ok(TaskStatus::Paused),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

/// A single task, as stored in the YAML frontmatter of its file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Lower is more urgent
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: i64,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Assigned by the store on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Local>>,
}

impl Task {
    /// A todo task with the default priority and nothing else set
    pub fn new(title: impl Into<String>) -> Self {
        Task {
            title: title.into(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
            status: TaskStatus::Todo,
            tags: Vec::new(),
            created_at: None,
            completed_at: None,
        }
    }
}

/// A task together with where it lives on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    #[serde(flatten)]
    pub task: Task,
    pub file_path: PathBuf,
    /// Directory-derived namespace, "" for the root topic
    pub topic: String,
}

impl TaskRecord {
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Short id shown by `list`: the timestamp part of the filename
    pub fn short_id(&self) -> String {
        self.file_name().chars().take(15).collect()
    }
}

/// Topic → tasks in that topic, in scan order
pub type TaskMap = IndexMap<String, Vec<TaskRecord>>;

/// Iterate every record of a map regardless of topic
pub fn all_records(tasks: &TaskMap) -> impl Iterator<Item = &TaskRecord> {
    tasks.values().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_cycle_wraps_both_ways() {
        assert_eq!(TaskStatus::Todo.cycle(true), TaskStatus::InProgress);
        assert_eq!(TaskStatus::InProgress.cycle(true), TaskStatus::Done);
        assert_eq!(TaskStatus::Done.cycle(true), TaskStatus::Paused);
        assert_eq!(TaskStatus::Cancelled.cycle(true), TaskStatus::Todo);
        assert_eq!(TaskStatus::Todo.cycle(false), TaskStatus::Cancelled);
        assert_eq!(TaskStatus::Paused.cycle(false), TaskStatus::Done);
    }

    #[test]
    fn status_from_str() {
        assert_eq!("in-progress".parse(), Ok(TaskStatus::InProgress));
        assert_eq!("paused".parse(), Ok(TaskStatus::Paused));
        assert!("finished".parse::<TaskStatus>().is_err());
        assert_eq!(TaskStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn short_id_is_timestamp_prefix() {
        let record = TaskRecord {
            task: Task::new("x"),
            file_path: PathBuf::from("/r/tasks/20250101-093000-x.md"),
            topic: String::new(),
        };
        assert_eq!(record.short_id(), "20250101-093000");
        assert_eq!(record.file_name(), "20250101-093000-x.md");
    }
}
