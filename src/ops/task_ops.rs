use std::path::PathBuf;

use crate::io::store::Store;
use crate::model::task::{Task, TaskRecord, TaskStatus, all_records};
use crate::ops::OpError;
use crate::ops::filter::BulkFilter;
use crate::ops::lookup::{find_task, parse_identity};

/// Fields for a new task besides its title
#[derive(Debug, Clone)]
pub struct NewTask {
    pub description: String,
    pub priority: i64,
    pub tags: Vec<String>,
    pub status: TaskStatus,
}

impl Default for NewTask {
    fn default() -> Self {
        NewTask {
            description: String::new(),
            priority: crate::model::task::DEFAULT_PRIORITY,
            tags: Vec::new(),
            status: TaskStatus::Todo,
        }
    }
}

/// Fields an edit may overwrite. Empty description or tags count as absent.
#[derive(Debug, Clone, Default)]
pub struct EditFields {
    pub description: Option<String>,
    pub priority: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub status: Option<TaskStatus>,
}

impl EditFields {
    pub fn apply(&self, task: &mut Task) {
        if let Some(description) = &self.description
            && !description.is_empty()
        {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(tags) = &self.tags
            && !tags.is_empty()
        {
            task.tags = tags.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

/// What `bulk` does with every matching task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Delete,
    Complete,
    Move(String),
}

/// Outcome of a bulk run
#[derive(Debug, Default)]
pub struct BulkReport {
    pub matched: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl BulkReport {
    pub fn succeeded(&self) -> usize {
        self.matched - self.failed.len()
    }
}

/// Split tags given as repeated and/or comma separated values.
pub fn split_tags<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Single-task operations
// ---------------------------------------------------------------------------

/// Create a task from `topic/title`.
pub fn add(store: &Store, input: &str, fields: NewTask) -> Result<TaskRecord, OpError> {
    let (topic, title) = parse_identity(input);
    if title.is_empty() {
        return Err(OpError::EmptyTitle);
    }
    let mut task = Task {
        title,
        description: fields.description,
        priority: fields.priority,
        status: fields.status,
        tags: fields.tags,
        created_at: None,
        completed_at: None,
    };
    let file_path = store.save(&topic, &mut task)?;
    Ok(TaskRecord {
        task,
        file_path,
        topic,
    })
}

fn locate(store: &Store, input: &str) -> Result<TaskRecord, OpError> {
    let (topic, title) = parse_identity(input);
    let tasks = store.load_all()?;
    find_task(&tasks, &topic, &title)
        .cloned()
        .ok_or_else(|| OpError::NotFound(input.to_string()))
}

/// Overwrite the given fields and rewrite the file in place.
pub fn edit(store: &Store, input: &str, fields: &EditFields) -> Result<TaskRecord, OpError> {
    let mut record = locate(store, input)?;
    fields.apply(&mut record.task);
    store.write(&record.file_path, &record.task)?;
    log::info!("edited {}", record.file_path.display());
    Ok(record)
}

pub fn delete(store: &Store, input: &str) -> Result<TaskRecord, OpError> {
    let record = locate(store, input)?;
    store.delete(&record)?;
    Ok(record)
}

pub fn move_task(store: &Store, input: &str, new_topic: &str) -> Result<PathBuf, OpError> {
    let record = locate(store, input)?;
    Ok(store.move_to(&record, new_topic)?)
}

pub fn copy_task(store: &Store, input: &str, new_topic: &str) -> Result<PathBuf, OpError> {
    let record = locate(store, input)?;
    Ok(store.copy_to(&record, new_topic)?)
}

/// Archive the task, using the store's first-match lookup.
pub fn complete(store: &Store, input: &str) -> Result<PathBuf, OpError> {
    let (topic, title) = parse_identity(input);
    store.complete(&topic, &title).map_err(|e| match e {
        crate::io::store::StoreError::NotFound(_) => OpError::NotFound(input.to_string()),
        other => OpError::Store(other),
    })
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

/// Apply `action` to every task matching `filter`. Failures on individual
/// files are collected; only an empty match is an error.
pub fn bulk(store: &Store, filter: &BulkFilter, action: &BulkAction) -> Result<BulkReport, OpError> {
    let tasks = store.load_all()?;
    let matches: Vec<&TaskRecord> = all_records(&tasks).filter(|r| filter.matches(r)).collect();
    if matches.is_empty() {
        return Err(OpError::NoMatch);
    }
    let mut report = BulkReport {
        matched: matches.len(),
        failed: Vec::new(),
    };
    for record in matches {
        let result = match action {
            BulkAction::Delete => store.delete(record),
            BulkAction::Complete => store.archive(record).map(|_| ()),
            BulkAction::Move(topic) => store.move_to(record, topic).map(|_| ()),
        };
        if let Err(e) = result {
            log::warn!("bulk: {}: {e}", record.file_path.display());
            report.failed.push((record.file_path.clone(), e.to_string()));
        }
    }
    Ok(report)
}
