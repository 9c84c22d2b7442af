use std::io::IsTerminal;
use std::path::Path;

use crossterm::style::Stylize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::model::task::{Task, TaskRecord};
use crate::ops::check::CheckReport;
use crate::ops::stats::Stats;

const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M";

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

/// Colours for CLI lines; plain text when the stream is not a terminal
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub enabled: bool,
}

impl Palette {
    pub fn for_stdout() -> Self {
        Palette {
            enabled: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn for_stderr() -> Self {
        Palette {
            enabled: std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn plain() -> Self {
        Palette { enabled: false }
    }

    pub fn success(&self, s: &str) -> String {
        if self.enabled { s.blue().bold().to_string() } else { s.to_string() }
    }

    pub fn secondary(&self, s: &str) -> String {
        if self.enabled { s.green().to_string() } else { s.to_string() }
    }

    pub fn error(&self, s: &str) -> String {
        if self.enabled { s.red().to_string() } else { s.to_string() }
    }

    pub fn muted(&self, s: &str) -> String {
        if self.enabled { s.dark_grey().to_string() } else { s.to_string() }
    }

    pub fn heading(&self, s: &str) -> String {
        if self.enabled { s.blue().bold().to_string() } else { s.to_string() }
    }

    pub fn bold(&self, s: &str) -> String {
        if self.enabled { s.bold().to_string() } else { s.to_string() }
    }
}

/// Output mode selected by `--json`, `--yaml` or `show -o`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_flags(json: bool, yaml: bool) -> Self {
        if json {
            OutputFormat::Json
        } else if yaml {
            OutputFormat::Yaml
        } else {
            OutputFormat::Pretty
        }
    }
}

/// Serialize a value as pretty JSON or YAML.
pub fn to_structured<T: Serialize>(
    value: &T,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?.trim_end().to_string(),
        _ => serde_json::to_string_pretty(value)?,
    })
}

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskRecordJson<'a> {
    pub id: String,
    pub topic: &'a str,
    pub file_path: &'a Path,
    #[serde(flatten)]
    pub task: &'a Task,
}

impl<'a> From<&'a TaskRecord> for TaskRecordJson<'a> {
    fn from(record: &'a TaskRecord) -> Self {
        TaskRecordJson {
            id: record.short_id(),
            topic: &record.topic,
            file_path: &record.file_path,
            task: &record.task,
        }
    }
}

#[derive(Serialize)]
pub struct CheckJson {
    pub valid: bool,
    pub failures: Vec<CheckFailureJson>,
    pub duplicates: Vec<String>,
}

#[derive(Serialize)]
pub struct CheckFailureJson {
    pub path: String,
    pub reason: String,
}

impl From<&CheckReport> for CheckJson {
    fn from(report: &CheckReport) -> Self {
        CheckJson {
            valid: report.is_clean(),
            failures: report
                .failures
                .iter()
                .map(|f| CheckFailureJson {
                    path: f.path.display().to_string(),
                    reason: f.reason.clone(),
                })
                .collect(),
            duplicates: report
                .duplicates
                .iter()
                .map(|d| d.active.display().to_string())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Topic as shown to users; the root topic is "."
pub fn topic_label(topic: &str) -> &str {
    if topic.is_empty() { "." } else { topic }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TOPIC")]
    topic: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "PRIORITY")]
    priority: i64,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "TAGS")]
    tags: String,
    #[tabled(rename = "CREATED")]
    created: String,
}

impl From<&TaskRecord> for TaskRow {
    fn from(record: &TaskRecord) -> Self {
        let task = &record.task;
        TaskRow {
            id: record.short_id(),
            topic: topic_label(&record.topic).to_string(),
            title: task.title.clone(),
            priority: task.priority,
            status: task.status.to_string(),
            tags: if task.tags.is_empty() {
                "-".to_string()
            } else {
                task.tags.join(",")
            },
            created: task
                .created_at
                .map(|t| t.format(CREATED_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

pub fn format_task_table(records: &[&TaskRecord]) -> String {
    if records.is_empty() {
        return "No tasks found.".to_string();
    }
    let rows: Vec<TaskRow> = records.iter().map(|r| TaskRow::from(*r)).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// `id  title  status`, one line per task
pub fn format_simple_lines(records: &[&TaskRecord], palette: Palette) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}",
                r.short_id(),
                palette.bold(&r.task.title),
                palette.success(r.task.status.as_str())
            )
        })
        .collect()
}

pub fn format_task_detail(record: &TaskRecord, palette: Palette) -> Vec<String> {
    let task = &record.task;
    let mut lines = vec![palette.heading(&task.title)];
    let created = task
        .created_at
        .map(|t| t.format(CREATED_FORMAT).to_string())
        .unwrap_or_default();
    let mut meta = vec![
        format!("ID: {}", record.short_id()),
        format!("Topic: {}", topic_label(&record.topic)),
        format!("Priority: {}", task.priority),
        format!("Status: {}", task.status),
        format!("Tags: {}", task.tags.join(", ")),
        format!("Created: {created}"),
    ];
    if let Some(done) = task.completed_at {
        meta.push(format!("Completed: {}", done.format(CREATED_FORMAT)));
    }
    lines.extend(meta.iter().map(|m| palette.secondary(m)));
    if !task.description.is_empty() {
        lines.push(String::new());
        lines.extend(task.description.lines().map(|l| palette.muted(l)));
    }
    lines
}

pub fn format_stats(stats: &Stats, palette: Palette) -> Vec<String> {
    let mut lines = vec![palette.heading("Task Statistics"), String::new(), "By Status:".into()];
    for (status, count) in &stats.by_status {
        lines.push(format!("  {status}: {count}"));
    }
    lines.push(String::new());
    lines.push("By Topic:".into());
    for (topic, count) in &stats.by_topic {
        lines.push(format!("  {}: {count}", topic_label(topic)));
    }
    lines.push(String::new());
    lines.push("By Tag:".into());
    for (tag, count) in &stats.by_tag {
        lines.push(format!("  {tag}: {count}"));
    }
    lines
}

pub fn format_check(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();
    if !report.failures.is_empty() {
        lines.push("Unreadable files:".to_string());
        for f in &report.failures {
            lines.push(format!("  {}: {}", f.path.display(), f.reason));
        }
    }
    if !report.duplicates.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Tasks in both tasks/ and archive/:".to_string());
        for d in &report.duplicates {
            lines.push(format!("  {}/{}", topic_label(&d.topic), d.file_name));
        }
        lines.push("  (run `tada check --fix` to finish archiving them)".to_string());
    }
    if report.is_clean() {
        lines.push("✓ store is consistent".to_string());
    } else {
        lines.push("✗ store has problems".to_string());
    }
    lines
}

pub fn onboarding_message() -> String {
    [
        "Initialized an empty tada project in .tada/",
        "",
        "  tada add \"Buy milk\"            add a task",
        "  tada add \"Work/Write report\"   add a task under a topic",
        "  tada list                      list tasks",
        "  tada tui                       browse tasks interactively",
        "  tada complete \"Buy milk\"       archive a finished task",
        "",
        "Run `tada --help` for every command.",
    ]
    .join("\n")
}
