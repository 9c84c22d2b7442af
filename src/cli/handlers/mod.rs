mod init;
pub use init::cmd_init;

use std::error::Error;
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigPaths};
use crate::io::logging::{self, LogTarget};
use crate::io::root::{self, RootError};
use crate::io::store::Store;
use crate::model::config::Config;
use crate::model::task::{Task, TaskStatus, all_records};
use crate::ops::export::{self, ExportError, ExportFormat};
use crate::ops::filter::{BulkFilter, ListFilter, SortKey, select};
use crate::ops::task_ops::{self, BulkAction, EditFields, NewTask, split_tags};
use crate::ops::{OpError, check, lookup, stats};

type HandlerResult = Result<(), Box<dyn Error>>;

/// Everything a command handler needs
struct Context {
    store: Store,
    config: Config,
    config_paths: ConfigPaths,
    format: OutputFormat,
    out: Palette,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Route a parsed command line. `init` and the TUI run before any project
/// context is opened; every other command gets one.
pub fn dispatch(cli: Cli) -> HandlerResult {
    let format = OutputFormat::from_flags(cli.json, cli.yaml);
    let project_dir = cli.project_dir.as_deref();
    let context = || open_context(project_dir, format);

    let result = match cli.command {
        None | Some(Commands::Tui) => return crate::tui::run(project_dir),
        // Runs before root discovery
        Some(Commands::Init) => return cmd_init(project_dir),

        // Read commands
        Some(Commands::List(args)) => cmd_list(&context()?, args),
        Some(Commands::Show(args)) => cmd_show(&context()?, args),
        Some(Commands::Stats) => cmd_stats(&context()?),
        Some(Commands::Export(args)) => cmd_export(&context()?, args),
        Some(Commands::Check(args)) => cmd_check(&context()?, args),

        // Write commands
        Some(Commands::Add(args)) => cmd_add(&context()?, args),
        Some(Commands::Edit(args)) => cmd_edit(&context()?, args),
        Some(Commands::Delete(args)) => cmd_delete(&context()?, args),
        Some(Commands::Move(args)) => cmd_move(&context()?, args),
        Some(Commands::Copy(args)) => cmd_copy(&context()?, args),
        Some(Commands::Complete(args)) => cmd_complete(&context()?, args),
        Some(Commands::Bulk(args)) => cmd_bulk(&context()?, args),

        Some(Commands::Config(args)) => cmd_config(&context()?, args),
    };

    match result {
        Err(e) if is_fatal(e.as_ref()) => Err(e),
        Err(e) => {
            log::debug!("command failed: {e}");
            eprintln!("{}", Palette::for_stderr().error(&format!("Error: {e}")));
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

/// Discover the store, start logging and load the layered config.
fn open_context(project_dir: Option<&str>, format: OutputFormat) -> Result<Context, Box<dyn Error>> {
    let store = discover_store(project_dir)?;
    if let Err(e) = logging::init_logging(store.root(), LogTarget::Cli) {
        eprintln!("warning: {e}");
    }
    let config_paths = ConfigPaths::for_root(store.root());
    Ok(Context {
        config: config_io::load_config_or_default(&config_paths),
        config_paths,
        store,
        format,
        out: Palette::for_stdout(),
    })
}

/// Errors that end the process with a non-zero status. Everything else is
/// reported as a styled line.
fn is_fatal(e: &(dyn Error + 'static)) -> bool {
    e.is::<ExportError>() || e.is::<RootError>()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Locate the `.tada` root from `-C` or the working directory.
pub fn discover_store(project_dir: Option<&str>) -> Result<Store, Box<dyn Error>> {
    let start = match project_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    Ok(Store::new(root::discover_root(&start)?))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn default_status(config: &Config) -> TaskStatus {
    match config.default_status.as_deref().map(str::parse::<TaskStatus>) {
        Some(Ok(status)) => status,
        Some(Err(e)) => {
            log::warn!("config default_status: {e}");
            TaskStatus::Todo
        }
        None => TaskStatus::Todo,
    }
}

fn print_topic(ctx: &Context, topic: &str) {
    if !topic.is_empty() {
        println!("{}", ctx.out.secondary(&format!("Topic: {topic}")));
    }
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs) -> HandlerResult {
    let tasks = ctx.store.load_all()?;
    let filter = ListFilter {
        status: args.status,
        search: args.search.filter(|q| !q.is_empty()),
    };
    let sort = args
        .sort
        .as_deref()
        .or(ctx.config.default_sort.as_deref())
        .map(SortKey::parse_lenient)
        .unwrap_or_default();
    let records = select(&tasks, &filter, sort);

    match ctx.format {
        OutputFormat::Pretty if args.simple => print_lines(&format_simple_lines(&records, ctx.out)),
        OutputFormat::Pretty => println!("{}", format_task_table(&records)),
        format => {
            let json: Vec<TaskRecordJson> = records.iter().map(|r| TaskRecordJson::from(*r)).collect();
            println!("{}", to_structured(&json, format)?);
        }
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: ShowArgs) -> HandlerResult {
    let input = args.task.join(" ");
    let format = match args.output.as_deref() {
        Some("json") => OutputFormat::Json,
        Some("yaml") => OutputFormat::Yaml,
        Some(_) => OutputFormat::Pretty,
        None => ctx.format,
    };
    let tasks = ctx.store.load_all()?;
    let record = lookup::resolve(&tasks, &input).ok_or_else(|| OpError::NotFound(input.clone()))?;

    match format {
        OutputFormat::Pretty => print_lines(&format_task_detail(record, ctx.out)),
        format => println!("{}", to_structured(&TaskRecordJson::from(record), format)?),
    }
    Ok(())
}

fn cmd_stats(ctx: &Context) -> HandlerResult {
    let tasks = ctx.store.load_all()?;
    let stats = stats::compute_stats(&tasks);
    match ctx.format {
        OutputFormat::Pretty => print_lines(&format_stats(&stats, ctx.out)),
        format => println!("{}", to_structured(&stats, format)?),
    }
    Ok(())
}

fn cmd_export(ctx: &Context, args: ExportArgs) -> HandlerResult {
    let format: ExportFormat = args.format.parse()?;
    let tasks = ctx.store.load_all()?;
    let all: Vec<&Task> = all_records(&tasks).map(|r| &r.task).collect();
    let path = Path::new(&args.output);
    export::export_to(Some(path), format, &all)?;
    if args.output != "-" {
        println!(
            "{}",
            ctx.out
                .success(&format!("Exported {} tasks to {}", all.len(), args.output))
        );
    }
    Ok(())
}

fn cmd_check(ctx: &Context, args: CheckArgs) -> HandlerResult {
    let report = if args.fix {
        let (fixed, report) = check::fix_store(&ctx.store)?;
        for dup in &fixed {
            println!(
                "{}",
                ctx.out.success(&format!(
                    "Removed active copy of archived task {}/{}",
                    topic_label(&dup.topic),
                    dup.file_name
                ))
            );
        }
        report
    } else {
        check::check_store(&ctx.store)?
    };

    match ctx.format {
        OutputFormat::Pretty => print_lines(&format_check(&report)),
        format => println!("{}", to_structured(&CheckJson::from(&report), format)?),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs) -> HandlerResult {
    let fields = NewTask {
        description: args.description,
        priority: args.priority,
        tags: split_tags(&args.tags),
        status: args.status.unwrap_or_else(|| default_status(&ctx.config)),
    };
    let record = task_ops::add(&ctx.store, &args.title.join(" "), fields)?;
    println!(
        "{}",
        ctx.out.success(&format!("Task added: {}", record.task.title))
    );
    print_topic(ctx, &record.topic);
    Ok(())
}

fn cmd_edit(ctx: &Context, args: EditArgs) -> HandlerResult {
    let tags = split_tags(&args.tags);
    let fields = EditFields {
        description: args.description,
        priority: args.priority,
        tags: (!tags.is_empty()).then_some(tags),
        status: args.status,
    };
    task_ops::edit(&ctx.store, &args.task.join(" "), &fields)?;
    println!("{}", ctx.out.success("Task updated."));
    Ok(())
}

fn cmd_delete(ctx: &Context, args: TaskArg) -> HandlerResult {
    task_ops::delete(&ctx.store, &args.identity())?;
    println!("{}", ctx.out.success("Task deleted."));
    Ok(())
}

fn cmd_move(ctx: &Context, args: RelocateArgs) -> HandlerResult {
    task_ops::move_task(&ctx.store, &args.task, &args.topic)?;
    println!(
        "{}",
        ctx.out
            .success(&format!("Task moved to topic: {}", args.topic))
    );
    Ok(())
}

fn cmd_copy(ctx: &Context, args: RelocateArgs) -> HandlerResult {
    task_ops::copy_task(&ctx.store, &args.task, &args.topic)?;
    println!(
        "{}",
        ctx.out
            .success(&format!("Task copied to topic: {}", args.topic))
    );
    Ok(())
}

fn cmd_complete(ctx: &Context, args: TaskArg) -> HandlerResult {
    let input = args.identity();
    task_ops::complete(&ctx.store, &input)?;
    let (topic, title) = lookup::parse_identity(&input);
    println!(
        "{}",
        ctx.out
            .success(&format!("Task completed and archived: {title}"))
    );
    print_topic(ctx, &topic);
    Ok(())
}

fn cmd_bulk(ctx: &Context, args: BulkArgs) -> HandlerResult {
    let action = if args.delete {
        BulkAction::Delete
    } else if args.complete {
        BulkAction::Complete
    } else if let Some(topic) = args.move_to {
        BulkAction::Move(topic)
    } else {
        return Err("choose one of --delete, --complete or --move".into());
    };
    let filter = BulkFilter {
        query: args.search.filter(|q| !q.is_empty()),
        tag: args.tag,
        status: args.status,
    };

    let report = task_ops::bulk(&ctx.store, &filter, &action)?;
    let err = Palette::for_stderr();
    for (path, reason) in &report.failed {
        eprintln!("{}", err.error(&format!("{}: {}", path.display(), reason)));
    }
    println!(
        "{}",
        ctx.out.success(&format!(
            "Bulk operation complete on {} tasks.",
            report.succeeded()
        ))
    );
    Ok(())
}

fn cmd_config(ctx: &Context, args: ConfigCmd) -> HandlerResult {
    match args.action {
        ConfigAction::Show => {
            let config = config_io::load_config(&ctx.config_paths)?;
            let format = match ctx.format {
                OutputFormat::Json => OutputFormat::Json,
                _ => OutputFormat::Yaml,
            };
            println!("{}", to_structured(&config, format)?);
        }
        ConfigAction::Set(set) => {
            let path = config_io::set_value(&ctx.config_paths, &set.key, &set.value, set.global)?;
            println!("{}", ctx.out.success("Config updated."));
            println!("{}", ctx.out.muted(&path.display().to_string()));
        }
    }
    Ok(())
}
