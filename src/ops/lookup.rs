use crate::io::store::normalize_topic;
use crate::model::task::{TaskMap, TaskRecord, all_records};

/// Split `topic/title` on the last `/`. Without a slash the topic is root.
pub fn parse_identity(input: &str) -> (String, String) {
    match input.rsplit_once('/') {
        Some((topic, title)) => (normalize_topic(topic), title.trim().to_string()),
        None => (String::new(), input.trim().to_string()),
    }
}

/// Find a task by exact topic and title. When several match, the last one
/// in scan order wins.
pub fn find_task<'a>(tasks: &'a TaskMap, topic: &str, title: &str) -> Option<&'a TaskRecord> {
    tasks
        .get(topic)?
        .iter()
        .rev()
        .find(|r| r.task.title == title)
}

/// Find a task whose filename starts with `prefix` (last match wins).
pub fn find_by_id<'a>(tasks: &'a TaskMap, prefix: &str) -> Option<&'a TaskRecord> {
    if prefix.is_empty() {
        return None;
    }
    all_records(tasks)
        .filter(|r| r.file_name().starts_with(prefix))
        .last()
}

/// Resolve user input as `topic/title` first, then as an id prefix.
pub fn resolve<'a>(tasks: &'a TaskMap, input: &str) -> Option<&'a TaskRecord> {
    let (topic, title) = parse_identity(input);
    find_task(tasks, &topic, &title).or_else(|| {
        if input.contains('/') {
            None
        } else {
            find_by_id(tasks, input.trim())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use std::path::PathBuf;

    fn record(topic: &str, title: &str, file: &str, description: &str) -> TaskRecord {
        let mut task = Task::new(title);
        task.description = description.into();
        TaskRecord {
            task,
            file_path: PathBuf::from(format!("/r/tasks/{topic}/{file}")),
            topic: topic.into(),
        }
    }

    fn map() -> TaskMap {
        let mut tasks = TaskMap::new();
        tasks.insert(
            "".into(),
            vec![record("", "Buy milk", "20250101-090000-buy-milk.md", "")],
        );
        tasks.insert(
            "Proj/Sub".into(),
            vec![
                record("Proj/Sub", "Dup", "20250102-090000-dup.md", "first"),
                record("Proj/Sub", "Dup", "20250103-090000-dup.md", "second"),
            ],
        );
        tasks
    }

    #[test]
    fn identity_splits_on_last_slash() {
        assert_eq!(parse_identity("Buy milk"), ("".into(), "Buy milk".into()));
        assert_eq!(parse_identity("Proj/Sub/Title"), ("Proj/Sub".into(), "Title".into()));
        assert_eq!(parse_identity("/Title"), ("".into(), "Title".into()));
        assert_eq!(parse_identity("Proj/"), ("Proj".into(), "".into()));
    }

    #[test]
    fn same_title_lookup_takes_last_match() {
        let tasks = map();
        let found = find_task(&tasks, "Proj/Sub", "Dup").unwrap();
        assert_eq!(found.task.description, "second");
        assert!(find_task(&tasks, "Proj", "Dup").is_none());
    }

    #[test]
    fn resolves_id_prefixes() {
        let tasks = map();
        assert_eq!(resolve(&tasks, "20250101").unwrap().task.title, "Buy milk");
        assert_eq!(resolve(&tasks, "20250102-090000").unwrap().task.description, "first");
        assert_eq!(resolve(&tasks, "Proj/Sub/Dup").unwrap().task.description, "second");
        assert!(resolve(&tasks, "1999").is_none());
        assert!(find_by_id(&tasks, "").is_none());
    }
}
