use crate::io::store::{Store, StoreError};
use crate::model::task::{Task, TaskRecord, TaskStatus};

const UNDO_STACK_LIMIT: usize = 500;

/// A reversible TUI action, holding the task as it was when the action ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoEntry {
    /// The file was deleted
    Delete(TaskRecord),
    /// Status was cycled into done and the task queued for archive
    Complete(TaskRecord),
}

impl UndoEntry {
    pub fn record(&self) -> &TaskRecord {
        match self {
            UndoEntry::Delete(record) | UndoEntry::Complete(record) => record,
        }
    }

    /// Write the inverse of the action to disk.
    ///
    /// A restored delete only carries the title and creation time; the rest
    /// of the task is not recovered.
    pub fn revert(&self, store: &Store) -> Result<(), StoreError> {
        match self {
            UndoEntry::Delete(record) => {
                let restored = Task {
                    title: record.task.title.clone(),
                    description: String::new(),
                    priority: 0,
                    status: TaskStatus::Todo,
                    tags: Vec::new(),
                    created_at: record.task.created_at,
                    completed_at: None,
                };
                store.write(&record.file_path, &restored)
            }
            UndoEntry::Complete(record) => {
                let mut task = record.task.clone();
                task.status = TaskStatus::Todo;
                task.completed_at = None;
                store.write(&record.file_path, &task)
            }
        }
    }

    /// Status line shown after a successful undo
    pub fn message(&self) -> &'static str {
        match self {
            UndoEntry::Delete(_) => "Undo: Task restored.",
            UndoEntry::Complete(_) => "Undo: Task marked as not completed.",
        }
    }
}

/// Last-in first-out history of TUI actions
#[derive(Debug, Default)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
}

impl UndoStack {
    pub fn new() -> Self {
        UndoStack::default()
    }

    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.push(entry);
        if self.entries.len() > UNDO_STACK_LIMIT {
            self.entries.drain(..self.entries.len() - UNDO_STACK_LIMIT);
        }
    }

    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
