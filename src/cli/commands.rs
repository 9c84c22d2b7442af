use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::model::task::TaskStatus;

#[derive(Parser)]
#[command(name = "tada", about = concat!("tada v", env!("CARGO_PKG_VERSION"), " - tasks as markdown files"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true, conflicts_with = "yaml")]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true)]
    pub yaml: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .tada folder in the current directory
    Init,
    /// Open the interactive task browser
    Tui,
    /// Add a new task
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Edit a task's fields
    Edit(EditArgs),
    /// Delete a task
    Delete(TaskArg),
    /// Move a task to another topic
    Move(RelocateArgs),
    /// Copy a task into another topic
    Copy(RelocateArgs),
    /// Mark a task done and archive it
    Complete(TaskArg),
    /// Delete, complete or move every matching task
    Bulk(BulkArgs),
    /// Export all tasks as csv, json or markdown
    Export(ExportArgs),
    /// Show details for a task
    Show(ShowArgs),
    /// Show counts by status, topic and tag
    Stats,
    /// View or set configuration
    Config(ConfigCmd),
    /// Find unreadable files and interrupted archives
    Check(CheckArgs),
}

// ---------------------------------------------------------------------------
// Task identity
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskArg {
    /// [topic/]title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub task: Vec<String>,
}

impl TaskArg {
    pub fn identity(&self) -> String {
        self.task.join(" ")
    }
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// [topic/]title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
    /// Task description
    #[arg(short, long, default_value = "")]
    pub description: String,
    /// Priority, lower is more urgent
    #[arg(short, long, default_value_t = crate::model::task::DEFAULT_PRIORITY, allow_negative_numbers = true)]
    pub priority: i64,
    /// Tags (comma separated or repeated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Initial status (default: config default_status, then todo)
    #[arg(long)]
    pub status: Option<TaskStatus>,
}

#[derive(Args)]
pub struct EditArgs {
    /// [topic/]title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub task: Vec<String>,
    /// New description (ignored when empty)
    #[arg(short, long)]
    pub description: Option<String>,
    /// New priority
    #[arg(short, long, allow_negative_numbers = true)]
    pub priority: Option<i64>,
    /// Replace tags (comma separated or repeated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,
    /// New status
    #[arg(long)]
    pub status: Option<TaskStatus>,
}

#[derive(Args)]
pub struct RelocateArgs {
    /// [topic/]title of the task
    pub task: String,
    /// Destination topic
    pub topic: String,
}

#[derive(Args)]
#[command(group(ArgGroup::new("action").required(true).args(["delete", "complete", "move_to"])))]
pub struct BulkArgs {
    /// Delete matching tasks
    #[arg(long)]
    pub delete: bool,
    /// Complete and archive matching tasks
    #[arg(long)]
    pub complete: bool,
    /// Move matching tasks to this topic
    #[arg(long = "move", value_name = "TOPIC")]
    pub move_to: Option<String>,
    /// Match title, description, tags or topic (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,
    /// Match tasks carrying exactly this tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Match tasks with this status
    #[arg(long)]
    pub status: Option<TaskStatus>,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks with this status
    #[arg(short, long)]
    pub status: Option<TaskStatus>,
    /// Search title, description, tags and topic
    #[arg(short = 'q', long)]
    pub search: Option<String>,
    /// Sort by: created, priority, title, status
    #[arg(long)]
    pub sort: Option<String>,
    /// Print `id title status` lines instead of a table
    #[arg(long)]
    pub simple: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// [topic/]title, or a filename prefix such as the id shown by `list`
    #[arg(required = true, num_args = 1..)]
    pub task: Vec<String>,
    /// Output format
    #[arg(short, long, value_parser = ["pretty", "json", "yaml"])]
    pub output: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Export format: csv, json, md
    #[arg(short, long, default_value = "json")]
    pub format: String,
    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "-")]
    pub output: String,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Remove the active copy of every task that is also archived
    #[arg(long)]
    pub fix: bool,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Set a configuration value
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// default_sort, theme, default_status or tags
    pub key: String,
    pub value: String,
    /// Write the global config instead of the project one
    #[arg(long)]
    pub global: bool,
}
