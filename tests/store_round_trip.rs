use chrono::{Local, TimeZone};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tada::io::store::Store;
use tada::model::task::{Task, TaskStatus, all_records};
use tada::ops::filter::BulkFilter;
use tada::ops::task_ops::{self, BulkAction, NewTask};
use tada::parse::frontmatter::{parse_task, render_task};
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Could not read fixture {}: {}", name, e))
}

fn store() -> (TempDir, Store) {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path().join(".tada"));
    store.ensure_directories().unwrap();
    (tmp, store)
}

#[test]
fn hand_written_file_is_read_from_frontmatter_only() {
    let task = parse_task(&fixture("hand_written.md")).unwrap();
    assert_eq!(task.title, "Renew passport");
    assert_eq!(task.description, "Book an appointment first");
    assert_eq!(task.priority, 2);
    assert_eq!(task.status, TaskStatus::Paused);
    assert_eq!(task.tags, vec!["admin", "travel"]);
    assert!(task.created_at.is_some());
    assert_eq!(task.completed_at, None);
}

#[test]
fn rewriting_regenerates_the_body() {
    let (_tmp, store) = store();
    let dir = store.topic_dir("Admin");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("20250304-093015-renew-passport.md");
    fs::write(&path, fixture("hand_written.md")).unwrap();

    let task = store.read(&path).unwrap();
    store.write(&path, &task).unwrap();
    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(!rewritten.contains("Notes typed below"));
    assert!(rewritten.ends_with("# Renew passport\n\nBook an appointment first\n\n"));
    assert_eq!(store.read(&path).unwrap(), task);

    // a second pass is byte-stable
    store.write(&path, &store.read(&path).unwrap()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), rewritten);
}

#[test]
fn render_then_parse_keeps_awkward_values() {
    let task = Task {
        title: "--- not a delimiter: \"quoted\"".into(),
        description: "first\n---\nafter a rule".into(),
        priority: -1,
        status: TaskStatus::Cancelled,
        tags: vec!["a b".into(), "#x".into()],
        created_at: Some(Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap()),
        completed_at: None,
    };
    let rendered = render_task(&task).unwrap();
    assert_eq!(parse_task(&rendered).unwrap(), task);
}

#[test]
fn saved_file_name_follows_the_clock_and_slug() {
    let (_tmp, store) = store();
    let now = Local.with_ymd_and_hms(2025, 6, 1, 8, 5, 9).unwrap();
    let mut task = Task::new("Fix: the Sink!");
    let path = store.save_at("Home/Kitchen", &mut task, now).unwrap();
    assert_eq!(
        path,
        store
            .tasks_dir()
            .join("Home")
            .join("Kitchen")
            .join("20250601-080509-fix-the-sink.md")
    );
    assert_eq!(task.created_at, Some(now));

    let tasks = store.load_all().unwrap();
    let record = &tasks["Home/Kitchen"][0];
    assert_eq!(record.task, task);
    assert_eq!(record.short_id(), "20250601-080509");
}

#[test]
fn unreadable_files_are_skipped_not_fatal() {
    let (_tmp, store) = store();
    task_ops::add(&store, "Work/Good", NewTask::default()).unwrap();
    fs::write(store.topic_dir("Work").join("bad.md"), "title: no delimiters\n").unwrap();
    fs::write(store.topic_dir("Work").join("notes.txt"), "ignored").unwrap();

    let scan = store.scan().unwrap();
    assert_eq!(scan.failures.len(), 1);
    let tasks = store.load_all().unwrap();
    let titles: Vec<&str> = all_records(&tasks)
        .map(|r| r.task.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Good"]);
}

#[test]
fn archive_keeps_topic_and_file_name() {
    let (_tmp, store) = store();
    let record = task_ops::add(&store, "Errands/Post letter", NewTask::default()).unwrap();
    let archived = task_ops::complete(&store, "Errands/Post letter").unwrap();

    assert!(!record.file_path.exists());
    assert_eq!(
        archived,
        store
            .archive_topic_dir("Errands")
            .join(record.file_name())
    );
    let task = store.read(&archived).unwrap();
    assert_eq!(task.status, TaskStatus::Done);
    assert!(task.completed_at.is_some());
    assert_eq!(task.created_at, record.task.created_at);
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn interrupted_archive_is_reconciled() {
    let (_tmp, store) = store();
    let record = task_ops::add(&store, "Half done", NewTask::default()).unwrap();
    fs::copy(
        &record.file_path,
        store.archive_dir().join(record.file_name()),
    )
    .unwrap();

    let dups = store.duplicates().unwrap();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].topic, "");

    let fixed = store.reconcile().unwrap();
    assert_eq!(fixed, dups);
    assert!(!record.file_path.exists());
    assert!(store.duplicates().unwrap().is_empty());
}

#[test]
fn bulk_move_then_delete() {
    let (_tmp, store) = store();
    for title in ["one", "two", "three"] {
        let fields = NewTask {
            tags: vec!["batch".into()],
            ..NewTask::default()
        };
        task_ops::add(&store, &format!("Inbox/{title}"), fields).unwrap();
    }
    task_ops::add(&store, "Inbox/keep", NewTask::default()).unwrap();

    let filter = BulkFilter {
        tag: Some("batch".into()),
        ..BulkFilter::default()
    };
    let report = task_ops::bulk(&store, &filter, &BulkAction::Move("Later".into())).unwrap();
    assert_eq!(report.succeeded(), 3);

    let tasks = store.load_all().unwrap();
    assert_eq!(tasks["Later"].len(), 3);
    assert_eq!(tasks["Inbox"].len(), 1);

    task_ops::bulk(&store, &filter, &BulkAction::Delete).unwrap();
    let tasks = store.load_all().unwrap();
    assert!(!tasks.contains_key("Later"));
    assert!(task_ops::bulk(&store, &filter, &BulkAction::Delete).is_err());
}
