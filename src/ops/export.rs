use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local, SecondsFormat};

use crate::model::task::Task;

const CSV_HEADER: [&str; 7] = [
    "Title",
    "Description",
    "Priority",
    "Status",
    "Tags",
    "CreatedAt",
    "CompletedAt",
];

/// Error type for exports
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported format: {0} (expected csv, json or md)")]
    UnsupportedFormat(String),
    #[error("could not create {path}: {source}")]
    Create { path: PathBuf, source: io::Error },
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        })
    }
}

fn timestamp(ts: Option<&DateTime<Local>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Write `tasks` in `format` to any writer.
pub fn write_export<W: Write>(
    mut out: W,
    format: ExportFormat,
    tasks: &[&Task],
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, tasks)?;
            writeln!(out)?;
        }
        ExportFormat::Csv => {
            let mut w = csv::Writer::from_writer(&mut out);
            w.write_record(CSV_HEADER)?;
            for task in tasks {
                w.write_record([
                    task.title.clone(),
                    task.description.clone(),
                    task.priority.to_string(),
                    task.status.to_string(),
                    task.tags.join(","),
                    timestamp(task.created_at.as_ref()),
                    timestamp(task.completed_at.as_ref()),
                ])?;
            }
            w.flush()?;
        }
        ExportFormat::Markdown => {
            for task in tasks {
                writeln!(out, "# {}\n", task.title)?;
                writeln!(out, "- **Description:** {}", task.description)?;
                writeln!(out, "- **Priority:** {}", task.priority)?;
                writeln!(out, "- **Status:** {}", task.status)?;
                writeln!(out, "- **Tags:** {}", task.tags.join(", "))?;
                writeln!(out, "- **Created At:** {}", timestamp(task.created_at.as_ref()))?;
                if let Some(done) = &task.completed_at {
                    writeln!(out, "- **Completed At:** {}", timestamp(Some(done)))?;
                }
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Export to a file, or to stdout when `path` is `None` or `-`.
pub fn export_to(path: Option<&Path>, format: ExportFormat, tasks: &[&Task]) -> Result<(), ExportError> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = File::create(p).map_err(|source| ExportError::Create {
                path: p.to_path_buf(),
                source,
            })?;
            write_export(io::BufWriter::new(file), format, tasks)?;
            log::info!("exported {} tasks as {format} to {}", tasks.len(), p.display());
            Ok(())
        }
        _ => write_export(io::stdout().lock(), format, tasks),
    }
}
