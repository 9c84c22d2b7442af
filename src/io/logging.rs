use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use flexi_logger::{
    Cleanup, Criterion, DeferredNow, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};

const LOG_DIR: &str = "logs";
const LOG_FILE_BASENAME: &str = "tada";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const LEVEL_ENV: &str = "TADA_LOG";
const DEFAULT_LEVEL: &str = "info";

static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

/// Which front end is logging. The CLI also echoes warnings to stderr; the
/// TUI owns the terminal and only logs to file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Cli,
    Tui,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("could not create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not start logger: {0}")]
    Start(#[from] FlexiLoggerError),
}

/// Directory the log files of a project go to
pub fn log_dir(root: &Path) -> PathBuf {
    root.join(LOG_DIR)
}

/// Start file logging under `<root>/logs/`. Only the first call per process
/// has any effect.
pub fn init_logging(root: &Path, target: LogTarget) -> Result<(), LoggingError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let dir = log_dir(root);
    std::fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let level = std::env::var(LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
    let logger = Logger::try_with_str(&level)
        .or_else(|_| Logger::try_with_str(DEFAULT_LEVEL))?
        .log_to_file(
            FileSpec::default()
                .directory(&dir)
                .basename(LOG_FILE_BASENAME)
                .suppress_timestamp(),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::Direct)
        .append()
        .duplicate_to_stderr(match target {
            LogTarget::Cli => Duplicate::Warn,
            LogTarget::Tui => Duplicate::None,
        })
        .format_for_files(flexi_logger::detailed_format)
        .format_for_stderr(stderr_format)
        .start()?;

    let _ = LOGGER.set(logger);
    log::debug!("logging to {} ({:?})", dir.display(), target);
    Ok(())
}

fn stderr_format(
    w: &mut dyn Write,
    _now: &mut DeferredNow,
    record: &log::Record,
) -> std::io::Result<()> {
    write!(w, "{}: {}", record.level().as_str().to_lowercase(), record.args())
}
