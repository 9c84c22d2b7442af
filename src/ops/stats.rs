use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::task::{TaskMap, TaskStatus, all_records};

/// Status order used in reports
pub const STATUS_REPORT_ORDER: [TaskStatus; 5] = [
    TaskStatus::Todo,
    TaskStatus::InProgress,
    TaskStatus::Done,
    TaskStatus::Paused,
    TaskStatus::Cancelled,
];

/// Task counts by status, topic and tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub by_status: IndexMap<String, usize>,
    pub by_topic: BTreeMap<String, usize>,
    pub by_tag: BTreeMap<String, usize>,
}

pub fn compute_stats(tasks: &TaskMap) -> Stats {
    let mut by_status: IndexMap<String, usize> = STATUS_REPORT_ORDER
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut by_topic = BTreeMap::new();
    let mut by_tag = BTreeMap::new();
    let mut total = 0;

    for (topic, records) in tasks {
        if !records.is_empty() {
            *by_topic.entry(topic.clone()).or_insert(0) += records.len();
        }
    }
    for record in all_records(tasks) {
        total += 1;
        *by_status
            .entry(record.task.status.as_str().to_string())
            .or_insert(0) += 1;
        for tag in &record.task.tags {
            *by_tag.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    Stats {
        total,
        by_status,
        by_topic,
        by_tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Task, TaskRecord};
    use std::path::PathBuf;

    fn record(topic: &str, status: TaskStatus, tags: &[&str]) -> TaskRecord {
        let mut task = Task::new("t");
        task.status = status;
        task.tags = tags.iter().map(|t| t.to_string()).collect();
        TaskRecord {
            task,
            file_path: PathBuf::new(),
            topic: topic.into(),
        }
    }

    #[test]
    fn counts_everything() {
        let mut tasks = TaskMap::new();
        tasks.insert(
            "".into(),
            vec![
                record("", TaskStatus::Todo, &["a", "b"]),
                record("", TaskStatus::Paused, &["a"]),
            ],
        );
        tasks.insert("work".into(), vec![record("work", TaskStatus::Todo, &["a", "a"])]);
        tasks.insert("empty".into(), vec![]);

        let stats = compute_stats(&tasks);
        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.by_status.keys().collect::<Vec<_>>(),
            vec!["todo", "in-progress", "done", "paused", "cancelled"]
        );
        assert_eq!(stats.by_status["todo"], 2);
        assert_eq!(stats.by_status["done"], 0);
        assert_eq!(stats.by_topic.get(""), Some(&2));
        assert_eq!(stats.by_topic.get("work"), Some(&1));
        assert!(!stats.by_topic.contains_key("empty"));
        assert_eq!(stats.by_tag["a"], 4);
        assert_eq!(stats.by_tag["b"], 1);
    }
}
