use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::model::task::{Task, TaskMap, TaskRecord, TaskStatus};
use crate::parse::{ParseError, generate_file_name, parse_task, render_task};

pub const TASKS_DIR: &str = "tasks";
pub const ARCHIVE_DIR: &str = "archive";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not remove {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },
    #[error("could not scan {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("{path}: {source}")]
    Parse { path: PathBuf, source: ParseError },
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("archived copy {0} does not match the task, original kept")]
    ArchiveMismatch(PathBuf),
    #[error("archived to {archived} but could not remove {original}: {source}")]
    ArchiveIncomplete {
        original: PathBuf,
        archived: PathBuf,
        source: io::Error,
    },
}

/// A file under `tasks/` that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of walking a tree: the tasks that loaded and the files that did not
#[derive(Debug, Default)]
pub struct Scan {
    pub tasks: TaskMap,
    pub failures: Vec<ScanFailure>,
}

/// A task file present in both `tasks/` and `archive/` under the same
/// topic and filename, left behind by an interrupted archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub topic: String,
    pub file_name: String,
    pub active: PathBuf,
    pub archived: PathBuf,
}

/// Write `content` to `path` through a temp file in the same directory.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Canonical form of a topic: slash-joined non-empty segments.
///
/// `.` and `..` segments are dropped so a topic can never leave its tree.
pub fn normalize_topic(topic: &str) -> String {
    topic
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect::<Vec<_>>()
        .join("/")
}

/// Markdown-file task store rooted at a `.tada` directory
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Store { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join(TASKS_DIR)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR)
    }

    /// Directory holding the active tasks of `topic`
    pub fn topic_dir(&self, topic: &str) -> PathBuf {
        join_topic(&self.tasks_dir(), topic)
    }

    /// Directory holding the archived tasks of `topic`
    pub fn archive_topic_dir(&self, topic: &str) -> PathBuf {
        join_topic(&self.archive_dir(), topic)
    }

    /// Create the root, `tasks/` and `archive/`. Safe to call repeatedly.
    pub fn ensure_directories(&self) -> Result<(), StoreError> {
        for dir in [self.root.clone(), self.tasks_dir(), self.archive_dir()] {
            create_dir(&dir)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Writing
    // -----------------------------------------------------------------------

    /// Save a new task under `topic`, assigning `created_at` if unset.
    pub fn save(&self, topic: &str, task: &mut Task) -> Result<PathBuf, StoreError> {
        self.save_at(topic, task, Local::now())
    }

    /// [`Store::save`] with an explicit clock. Two saves of the same title in
    /// the same second map to the same file; the second overwrites the first.
    pub fn save_at(
        &self,
        topic: &str,
        task: &mut Task,
        now: DateTime<Local>,
    ) -> Result<PathBuf, StoreError> {
        self.ensure_directories()?;
        if task.created_at.is_none() {
            task.created_at = Some(now);
        }
        let dir = self.topic_dir(&normalize_topic(topic));
        create_dir(&dir)?;
        let path = dir.join(generate_file_name(&task.title, now));
        self.write(&path, task)?;
        log::info!("saved task '{}' to {}", task.title, path.display());
        Ok(path)
    }

    /// Rewrite the task file at `path` in place.
    pub fn write(&self, path: &Path, task: &Task) -> Result<(), StoreError> {
        let content = render_task(task).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        atomic_write(path, content.as_bytes()).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse a single task file.
    pub fn read(&self, path: &Path) -> Result<Task, StoreError> {
        let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_task(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Walk `tasks/`, keeping unparseable files as failures.
    pub fn scan(&self) -> Result<Scan, StoreError> {
        self.ensure_directories()?;
        self.scan_tree(&self.tasks_dir())
    }

    /// Walk `archive/` the same way as [`Store::scan`].
    pub fn scan_archive(&self) -> Result<Scan, StoreError> {
        self.ensure_directories()?;
        self.scan_tree(&self.archive_dir())
    }

    /// All active tasks by topic. Unparseable files are skipped with a
    /// warning.
    pub fn load_all(&self) -> Result<TaskMap, StoreError> {
        let scan = self.scan()?;
        for failure in &scan.failures {
            log::warn!(
                "skipping {}: {}",
                failure.path.display(),
                failure.reason
            );
        }
        Ok(scan.tasks)
    }

    fn scan_tree(&self, base: &Path) -> Result<Scan, StoreError> {
        let mut scan = Scan::default();
        for entry in WalkDir::new(base).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(StoreError::Walk {
                        path: base.to_path_buf(),
                        source: err,
                    });
                }
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    scan.failures.push(ScanFailure {
                        path,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            if !is_task_file(&entry) {
                continue;
            }
            let path = entry.path();
            let topic = topic_of(base, path);
            match self.read(path) {
                Ok(task) => scan.tasks.entry(topic.clone()).or_default().push(TaskRecord {
                    task,
                    file_path: path.to_path_buf(),
                    topic,
                }),
                Err(StoreError::Parse { source, .. }) => scan.failures.push(ScanFailure {
                    path: path.to_path_buf(),
                    reason: source.to_string(),
                }),
                Err(err) => scan.failures.push(ScanFailure {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                }),
            }
        }
        log::debug!(
            "scanned {}: {} topics, {} failures",
            base.display(),
            scan.tasks.len(),
            scan.failures.len()
        );
        Ok(scan)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Archive the first task in `topic` titled `title`.
    pub fn complete(&self, topic: &str, title: &str) -> Result<PathBuf, StoreError> {
        let topic = normalize_topic(topic);
        let tasks = self.load_all()?;
        let record = tasks
            .get(&topic)
            .and_then(|records| records.iter().find(|r| r.task.title == title))
            .ok_or_else(|| StoreError::NotFound(title.to_string()))?;
        self.archive(record)
    }

    /// Mark `record` done and move it from `tasks/` to `archive/`, keeping
    /// its topic and filename.
    ///
    /// The archived copy is written atomically and re-read before the
    /// original is removed. If the removal fails both copies remain and
    /// [`StoreError::ArchiveIncomplete`] is returned.
    pub fn archive(&self, record: &TaskRecord) -> Result<PathBuf, StoreError> {
        let mut task = record.task.clone();
        task.status = TaskStatus::Done;
        task.completed_at = Some(Local::now());

        let dir = self.archive_topic_dir(&record.topic);
        create_dir(&dir)?;
        let archived = dir.join(record.file_name());
        self.write(&archived, &task)?;

        if self.read(&archived)? != task {
            if let Err(e) = fs::remove_file(&archived) {
                log::warn!("could not remove mismatched copy {}: {e}", archived.display());
            }
            return Err(StoreError::ArchiveMismatch(archived));
        }

        fs::remove_file(&record.file_path).map_err(|source| StoreError::ArchiveIncomplete {
            original: record.file_path.clone(),
            archived: archived.clone(),
            source,
        })?;
        log::info!("archived '{}' to {}", task.title, archived.display());
        Ok(archived)
    }

    pub fn delete(&self, record: &TaskRecord) -> Result<(), StoreError> {
        fs::remove_file(&record.file_path).map_err(|source| StoreError::Remove {
            path: record.file_path.clone(),
            source,
        })?;
        log::info!("deleted {}", record.file_path.display());
        Ok(())
    }

    /// Move the file into `tasks/<topic>/`, keeping its filename.
    pub fn move_to(&self, record: &TaskRecord, topic: &str) -> Result<PathBuf, StoreError> {
        let target = self.relocation_target(record, topic)?;
        if target != record.file_path {
            fs::rename(&record.file_path, &target).map_err(|source| StoreError::Write {
                path: target.clone(),
                source,
            })?;
            log::info!(
                "moved {} to {}",
                record.file_path.display(),
                target.display()
            );
        }
        Ok(target)
    }

    /// Copy the file into `tasks/<topic>/`, keeping its filename.
    pub fn copy_to(&self, record: &TaskRecord, topic: &str) -> Result<PathBuf, StoreError> {
        let target = self.relocation_target(record, topic)?;
        if target != record.file_path {
            fs::copy(&record.file_path, &target).map_err(|source| StoreError::Write {
                path: target.clone(),
                source,
            })?;
            log::info!(
                "copied {} to {}",
                record.file_path.display(),
                target.display()
            );
        }
        Ok(target)
    }

    fn relocation_target(&self, record: &TaskRecord, topic: &str) -> Result<PathBuf, StoreError> {
        let dir = self.topic_dir(&normalize_topic(topic));
        create_dir(&dir)?;
        Ok(dir.join(record.file_name()))
    }

    // -----------------------------------------------------------------------
    // Consistency
    // -----------------------------------------------------------------------

    /// Files present under the same topic and name in both trees.
    pub fn duplicates(&self) -> Result<Vec<Duplicate>, StoreError> {
        self.ensure_directories()?;
        let archive_dir = self.archive_dir();
        let mut found = Vec::new();
        for entry in WalkDir::new(&archive_dir).sort_by_file_name() {
            let entry = entry.map_err(|source| StoreError::Walk {
                path: archive_dir.clone(),
                source,
            })?;
            if !is_task_file(&entry) {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&archive_dir) else {
                continue;
            };
            let active = self.tasks_dir().join(rel);
            if active.is_file() {
                found.push(Duplicate {
                    topic: topic_of(&archive_dir, entry.path()),
                    file_name: entry.file_name().to_string_lossy().into_owned(),
                    active,
                    archived: entry.path().to_path_buf(),
                });
            }
        }
        Ok(found)
    }

    /// Finish interrupted archives by removing the active copy of every
    /// duplicate. Returns the duplicates that were resolved.
    pub fn reconcile(&self) -> Result<Vec<Duplicate>, StoreError> {
        let duplicates = self.duplicates()?;
        for dup in &duplicates {
            fs::remove_file(&dup.active).map_err(|source| StoreError::Remove {
                path: dup.active.clone(),
                source,
            })?;
            log::info!("removed archived duplicate {}", dup.active.display());
        }
        Ok(duplicates)
    }
}

fn create_dir(dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn join_topic(base: &Path, topic: &str) -> PathBuf {
    let mut dir = base.to_path_buf();
    for segment in topic.split('/').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    dir
}

fn is_task_file(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "md")
}

/// Topic of a file: its parent directory relative to `base`, "/"-joined
fn topic_of(base: &Path, path: &Path) -> String {
    path.parent()
        .and_then(|dir| dir.strip_prefix(base).ok())
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}
