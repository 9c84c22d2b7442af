use std::cmp::Ordering;
use std::str::FromStr;

use crate::model::task::{TaskMap, TaskRecord, TaskStatus, all_records};

/// Case-insensitive substring match over title, description, the
/// comma-joined tags and the topic. An empty query matches everything.
pub fn matches_query(record: &TaskRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    let task = &record.task;
    task.title.to_lowercase().contains(&q)
        || task.description.to_lowercase().contains(&q)
        || task.tags.join(",").to_lowercase().contains(&q)
        || record.topic.to_lowercase().contains(&q)
}

/// Sort order for task listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Created,
    Priority,
    Title,
    Status,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(SortKey::Created),
            "priority" => Ok(SortKey::Priority),
            "title" => Ok(SortKey::Title),
            "status" => Ok(SortKey::Status),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

impl SortKey {
    /// Parse a key, falling back to [`SortKey::Created`] for anything
    /// unrecognised.
    pub fn parse_lenient(s: &str) -> SortKey {
        s.parse().unwrap_or_default()
    }

    fn compare(self, a: &TaskRecord, b: &TaskRecord) -> Ordering {
        match self {
            SortKey::Created => a.task.created_at.cmp(&b.task.created_at),
            SortKey::Priority => a.task.priority.cmp(&b.task.priority),
            SortKey::Title => a.task.title.cmp(&b.task.title),
            SortKey::Status => a.task.status.as_str().cmp(b.task.status.as_str()),
        }
    }
}

/// Stable sort; ties keep scan order.
pub fn sort_records(records: &mut [&TaskRecord], key: SortKey) {
    records.sort_by(|a, b| key.compare(a, b));
}

/// Predicates for `list`
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub status: Option<TaskStatus>,
    pub search: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, record: &TaskRecord) -> bool {
        self.status.is_none_or(|s| record.task.status == s)
            && self
                .search
                .as_deref()
                .is_none_or(|q| matches_query(record, q))
    }
}

/// Filter and sort every task for display.
pub fn select<'a>(tasks: &'a TaskMap, filter: &ListFilter, sort: SortKey) -> Vec<&'a TaskRecord> {
    let mut records: Vec<&TaskRecord> = all_records(tasks).filter(|r| filter.matches(r)).collect();
    sort_records(&mut records, sort);
    records
}

/// Conjunction of optional predicates for `bulk`
#[derive(Debug, Clone, Default)]
pub struct BulkFilter {
    pub query: Option<String>,
    /// Exact tag membership
    pub tag: Option<String>,
    pub status: Option<TaskStatus>,
}

impl BulkFilter {
    pub fn matches(&self, record: &TaskRecord) -> bool {
        self.query
            .as_deref()
            .is_none_or(|q| matches_query(record, q))
            && self
                .tag
                .as_deref()
                .is_none_or(|tag| record.task.tags.iter().any(|t| t == tag))
            && self.status.is_none_or(|s| record.task.status == s)
    }
}
