use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::io;
use std::ops::Range;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::config_io::{self, ConfigPaths};
use crate::io::logging::{self, LogTarget};
use crate::io::store::Store;
use crate::model::config::Config;
use crate::model::task::{Task, TaskMap, TaskRecord, TaskStatus};
use crate::ops::export::{self, ExportFormat};
use crate::ops::filter::matches_query;
use crate::ops::task_ops;

use super::form::TaskForm;
use super::input;
use super::render;
use super::theme::Theme;
use super::undo::{UndoEntry, UndoStack};

/// Lines taken by the header, help line, spacer and status row
pub const RESERVED_LINES: usize = 4;
/// Height assumed before the terminal reports one
pub const FALLBACK_HEIGHT: usize = 24;

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    /// Editing an existing task in place
    Edit { target: TaskRecord, form: TaskForm },
    Add { form: TaskForm },
}

/// A row of the list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Topic { topic: String },
    Task { topic: String, record: TaskRecord },
}

impl Item {
    pub fn topic(&self) -> &str {
        match self {
            Item::Topic { topic } | Item::Task { topic, .. } => topic,
        }
    }

    pub fn record(&self) -> Option<&TaskRecord> {
        match self {
            Item::Task { record, .. } => Some(record),
            Item::Topic { .. } => None,
        }
    }
}

/// Two-step export of the bulk selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportPrompt {
    Format,
    Path { format: ExportFormat, path: String },
}

/// Main application state
pub struct App {
    pub store: Store,
    pub tasks: TaskMap,
    pub items: Vec<Item>,
    pub selected: usize,
    pub expanded: HashSet<String>,
    pub mode: Mode,
    pub undo_stack: UndoStack,
    /// Bulk selection, as indices into `items`
    pub selection: BTreeSet<usize>,
    /// First end of a pending `V` range
    pub anchor: Option<usize>,
    pub yanked: Option<TaskRecord>,
    /// Live query while search mode is on
    pub search: Option<String>,
    pub show_details: bool,
    /// Task awaiting delete confirmation
    pub pending_delete: Option<TaskRecord>,
    /// Tasks cycled to done this session, archived on quit
    pub archive_queue: Vec<TaskRecord>,
    pub export_prompt: Option<ExportPrompt>,
    pub status_message: Option<String>,
    pub error: Option<String>,
    pub theme: Theme,
    /// Tags pre-filled in the add form
    pub default_tags: Vec<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Store, config: &Config) -> Self {
        App {
            store,
            tasks: TaskMap::new(),
            items: Vec::new(),
            selected: 0,
            expanded: HashSet::new(),
            mode: Mode::List,
            undo_stack: UndoStack::new(),
            selection: BTreeSet::new(),
            anchor: None,
            yanked: None,
            search: None,
            show_details: false,
            pending_delete: None,
            archive_queue: Vec::new(),
            export_prompt: None,
            status_message: None,
            error: None,
            theme: Theme::from_config(config),
            default_tags: config.tags.clone().unwrap_or_default(),
            should_quit: false,
        }
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Replace the snapshot with a fresh scan of the store.
    pub fn reload(&mut self) {
        match self.store.load_all() {
            Ok(tasks) => self.tasks = tasks,
            Err(e) => {
                log::error!("reload failed: {e}");
                self.error = Some(e.to_string());
            }
        }
        self.rebuild_items();
    }

    pub fn rebuild_items(&mut self) {
        self.items = build_items(&self.tasks, &self.expanded, &self.archive_queue);
        self.clamp_selected();
    }

    fn clamp_selected(&mut self) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            self.selected = 0;
        } else if !visible.contains(&self.selected) {
            self.selected = visible
                .iter()
                .copied()
                .find(|&i| i > self.selected)
                .unwrap_or(visible[visible.len() - 1]);
        }
    }

    pub fn is_queued(&self, path: &Path) -> bool {
        self.archive_queue.iter().any(|r| r.file_path == path)
    }

    /// The focused row, if it is visible under the current search
    pub fn current_item(&self) -> Option<&Item> {
        if self.active_query().is_some() && !self.visible_indices().contains(&self.selected) {
            return None;
        }
        self.items.get(self.selected)
    }

    pub fn current_record(&self) -> Option<&TaskRecord> {
        self.current_item().and_then(Item::record)
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Non-empty search query, if any
    pub fn active_query(&self) -> Option<&str> {
        self.search.as_deref().filter(|q| !q.is_empty())
    }

    /// Case-insensitive regex for highlighting the live query
    pub fn active_search_re(&self) -> Option<Regex> {
        let query = self.active_query()?;
        Regex::new(&format!("(?i){}", regex::escape(query))).ok()
    }

    /// Indices of `items` shown under the current search. A topic row stays
    /// visible while any of its tasks match.
    pub fn visible_indices(&self) -> Vec<usize> {
        let Some(query) = self.active_query() else {
            return (0..self.items.len()).collect();
        };
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| match item {
                Item::Task { record, .. } => matches_query(record, query),
                Item::Topic { topic } => {
                    topic.to_lowercase().contains(&query.to_lowercase())
                        || self
                            .tasks
                            .get(topic)
                            .is_some_and(|records| records.iter().any(|r| matches_query(r, query)))
                }
            })
            .map(|(i, _)| i)
            .collect()
    }

    pub fn set_search(&mut self, query: Option<String>) {
        self.search = query;
        self.clamp_selected();
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn move_down(&mut self) {
        let visible = self.visible_indices();
        if let Some(&next) = visible.iter().find(|&&i| i > self.selected) {
            self.selected = next;
        }
    }

    pub fn move_up(&mut self) {
        let visible = self.visible_indices();
        if let Some(&prev) = visible.iter().rev().find(|&&i| i < self.selected) {
            self.selected = prev;
        }
    }

    /// Expand or collapse a topic row, or open the edit form on a task row.
    pub fn activate(&mut self) {
        match self.current_item().cloned() {
            Some(Item::Topic { topic }) => {
                if !self.expanded.remove(&topic) {
                    self.expanded.insert(topic);
                }
                self.rebuild_items();
            }
            Some(Item::Task { record, .. }) => self.open_edit(record),
            None => {}
        }
    }

    pub fn open_edit(&mut self, record: TaskRecord) {
        let form = TaskForm::for_task(&record.task);
        self.mode = Mode::Edit {
            target: record,
            form,
        };
    }

    /// Open the add form, pre-filling the topic of the focused row.
    pub fn open_add(&mut self) {
        let topic = self
            .current_item()
            .map(|item| item.topic().to_string())
            .unwrap_or_default();
        self.mode = Mode::Add {
            form: TaskForm::for_new(&topic, &self.default_tags),
        };
    }

    // -----------------------------------------------------------------------
    // Forms
    // -----------------------------------------------------------------------

    pub fn form_mut(&mut self) -> Option<&mut TaskForm> {
        match &mut self.mode {
            Mode::Edit { form, .. } | Mode::Add { form } => Some(form),
            Mode::List => None,
        }
    }

    /// Save the open form. On failure the form stays open with the error
    /// shown.
    pub fn submit_form(&mut self) {
        // Ok(Some(path)) when an edited task is no longer done
        let result = match &self.mode {
            Mode::Edit { target, form } => {
                let mut task = target.task.clone();
                form.apply_to(&mut task);
                self.store
                    .write(&target.file_path, &task)
                    .map(|()| (task.status != TaskStatus::Done).then(|| target.file_path.clone()))
                    .map_err(|e| e.to_string())
            }
            Mode::Add { form } => task_ops::add(&self.store, &form.title, form.to_new_task())
                .map(|_| None)
                .map_err(|e| e.to_string()),
            Mode::List => return,
        };
        match result {
            Ok(left_done) => {
                if let Some(path) = left_done {
                    self.dequeue(&path);
                }
                self.mode = Mode::List;
                self.reload();
            }
            Err(e) => self.error = Some(e),
        }
    }

    pub fn close_form(&mut self) {
        self.mode = Mode::List;
    }

    // -----------------------------------------------------------------------
    // Task actions
    // -----------------------------------------------------------------------

    pub fn yank(&mut self) {
        if let Some(record) = self.current_record() {
            self.yanked = Some(record.clone());
            self.status_message = Some("Task yanked.".to_string());
        }
    }

    /// Save a copy of the yanked task titled "<title> (Copy)" in the same
    /// topic.
    pub fn paste(&mut self) {
        let Some(yanked) = &self.yanked else {
            return;
        };
        let mut task = Task {
            title: format!("{} (Copy)", yanked.task.title),
            description: yanked.task.description.clone(),
            priority: yanked.task.priority,
            status: yanked.task.status,
            tags: yanked.task.tags.clone(),
            created_at: None,
            completed_at: None,
        };
        match self.store.save(&yanked.topic, &mut task) {
            Ok(_) => self.status_message = Some("Task pasted.".to_string()),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.reload();
    }

    pub fn request_delete(&mut self) {
        if let Some(record) = self.current_record() {
            self.pending_delete = Some(record.clone());
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(record) = self.pending_delete.take() {
            match self.store.delete(&record) {
                Ok(()) => {
                    self.dequeue(&record.file_path);
                    self.undo_stack.push(UndoEntry::Delete(record));
                    self.status_message = Some("Task deleted. Press 'u' to undo.".to_string());
                }
                Err(e) => self.error = Some(e.to_string()),
            }
            self.reload();
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Cycle one task's status and write it back. Returns true when the task
    /// moved forward into done.
    fn cycle_record(&mut self, record: &TaskRecord, forward: bool) -> bool {
        let before = record.task.clone();
        let mut task = record.task.clone();
        task.status = task.status.cycle(forward);
        if let Err(e) = self.store.write(&record.file_path, &task) {
            self.error = Some(e.to_string());
            return false;
        }
        match task.status {
            // only `s` into done archives; `S` into done just writes the status
            TaskStatus::Done if forward => {
                if !self.is_queued(&record.file_path) {
                    self.archive_queue.push(TaskRecord {
                        task: task.clone(),
                        ..record.clone()
                    });
                }
                self.undo_stack.push(UndoEntry::Complete(TaskRecord {
                    task: before,
                    ..record.clone()
                }));
                return true;
            }
            TaskStatus::Done => {}
            _ => self.dequeue(&record.file_path),
        }
        false
    }

    /// `s` / `S`: cycle the focused task, or every selected task on `s`.
    pub fn cycle_status(&mut self, forward: bool) {
        if forward && !self.selection.is_empty() {
            for record in self.selected_records() {
                self.cycle_record(&record, true);
            }
            self.status_message =
                Some("Bulk status cycle complete. Press 'u' to undo last.".to_string());
        } else if let Some(record) = self.current_record().cloned() {
            if self.cycle_record(&record, forward) {
                self.status_message = Some("Task completed. Press 'u' to undo.".to_string());
            }
        } else {
            return;
        }
        self.reload();
    }

    fn dequeue(&mut self, path: &Path) {
        self.archive_queue.retain(|r| r.file_path != path);
    }

    pub fn undo(&mut self) {
        let Some(entry) = self.undo_stack.pop() else {
            self.status_message = Some("Nothing to undo.".to_string());
            return;
        };
        match entry.revert(&self.store) {
            Ok(()) => {
                self.dequeue(&entry.record().file_path);
                self.status_message = Some(entry.message().to_string());
            }
            Err(e) => {
                log::warn!("undo failed: {e}");
                self.status_message = Some("Undo failed.".to_string());
            }
        }
        self.reload();
    }

    // -----------------------------------------------------------------------
    // Bulk selection
    // -----------------------------------------------------------------------

    pub fn selected_records(&self) -> Vec<TaskRecord> {
        self.selection
            .iter()
            .filter_map(|&i| self.items.get(i).and_then(Item::record))
            .cloned()
            .collect()
    }

    pub fn toggle_selection(&mut self) {
        if !self.selection.remove(&self.selected) {
            self.selection.insert(self.selected);
        }
        self.anchor = None;
    }

    /// First press anchors and selects only the current row; the second adds
    /// the inclusive range back to the anchor.
    pub fn range_selection(&mut self) {
        match self.anchor.take() {
            None => {
                self.anchor = Some(self.selected);
                self.selection.clear();
                self.selection.insert(self.selected);
            }
            Some(anchor) => {
                let (start, end) = if anchor <= self.selected {
                    (anchor, self.selected)
                } else {
                    (self.selected, anchor)
                };
                self.selection.extend(start..=end);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.anchor = None;
    }

    /// Delete every selected task at once, one undo entry per file.
    pub fn delete_selected(&mut self) {
        for record in self.selected_records() {
            match self.store.delete(&record) {
                Ok(()) => {
                    self.dequeue(&record.file_path);
                    self.undo_stack.push(UndoEntry::Delete(record));
                }
                Err(e) => log::warn!("bulk delete: {e}"),
            }
        }
        self.status_message = Some("Bulk delete complete. Press 'u' to undo last.".to_string());
        self.clear_selection();
        self.reload();
    }

    /// Write the selected tasks to `path` and report the outcome.
    pub fn export_selected(&mut self, format: ExportFormat, path: &str) {
        let records = self.selected_records();
        let tasks: Vec<&Task> = records.iter().map(|r| &r.task).collect();
        let result = if tasks.is_empty() {
            Err("no tasks selected".to_string())
        } else {
            export::export_to(Some(Path::new(path)), format, &tasks).map_err(|e| e.to_string())
        };
        self.status_message = Some(match result {
            Ok(()) => format!("Exported selected tasks to {path}"),
            Err(e) => format!("Export failed: {e}"),
        });
    }

    // -----------------------------------------------------------------------
    // Exit
    // -----------------------------------------------------------------------

    /// Archive every queued task, then stop the event loop. Archive errors
    /// are logged and otherwise ignored.
    pub fn quit(&mut self) {
        for record in std::mem::take(&mut self.archive_queue) {
            if let Err(e) = self.store.complete(&record.topic, &record.task.title) {
                log::warn!("archive on exit failed for '{}': {e}", record.task.title);
            }
        }
        self.should_quit = true;
    }
}

/// Flatten the snapshot into list rows: topic rows in name order (with their
/// tasks when expanded), then root tasks. Done tasks are hidden unless queued
/// for archive.
pub fn build_items(tasks: &TaskMap, expanded: &HashSet<String>, queue: &[TaskRecord]) -> Vec<Item> {
    let shown = |record: &&TaskRecord| {
        record.task.status != TaskStatus::Done
            || queue.iter().any(|q| q.file_path == record.file_path)
    };
    let task_item = |record: &TaskRecord| Item::Task {
        topic: record.topic.clone(),
        record: record.clone(),
    };

    let mut topics: Vec<&String> = tasks.keys().filter(|t| !t.is_empty()).collect();
    topics.sort();

    let mut items = Vec::new();
    for topic in topics {
        items.push(Item::Topic {
            topic: topic.clone(),
        });
        if expanded.contains(topic) {
            items.extend(tasks[topic].iter().filter(shown).map(task_item));
        }
    }
    if let Some(root) = tasks.get("") {
        items.extend(root.iter().filter(shown).map(task_item));
    }
    items
}

/// Rows to draw: everything when it fits, otherwise a window of
/// `height - RESERVED_LINES` rows centred on `selected`.
pub fn visible_window(len: usize, selected: usize, height: usize) -> Range<usize> {
    let height = if height == 0 { FALLBACK_HEIGHT } else { height };
    let rows = height.saturating_sub(RESERVED_LINES).max(1);
    if len <= rows {
        return 0..len;
    }
    let start = selected.saturating_sub(rows / 2).min(len - rows);
    start..start + rows
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

/// Open the interactive task browser on the project found from `project_dir`
/// or the working directory.
pub fn run(project_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let store = crate::cli::handlers::discover_store(project_dir)?;
    if let Err(e) = logging::init_logging(store.root(), LogTarget::Tui) {
        eprintln!("warning: {e}");
    }
    let config = config_io::load_config_or_default(&ConfigPaths::for_root(store.root()));

    let mut app = App::new(store, &config);
    app.reload();
    log::info!("tui started with {} rows", app.items.len());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal before the default hook prints the panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
