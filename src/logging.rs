use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use flexi_logger::{detailed_format, FileSpec, Logger, LoggerHandle, WriteMode};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".book-collection-manager";
/// Sub-folder of the data directory that receives log files.
const LOG_DIR_NAME: &str = "logs";
/// Base name of the log files written by flexi_logger.
const LOG_BASENAME: &str = "book-collection";
/// Level spec handed to flexi_logger.
const LOG_SPEC: &str = "info";

/// Route `log` records to a file in the data directory. The terminal belongs to
/// the TUI, so nothing is written to stdout or stderr. The returned handle must
/// stay alive for as long as logging is wanted.
pub fn init_logging() -> Result<LoggerHandle> {
    init_logging_in(log_dir()?)
}

fn init_logging_in(dir: PathBuf) -> Result<LoggerHandle> {
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    Logger::try_with_str(LOG_SPEC)
        .context("invalid log specification")?
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_BASENAME))
        .append()
        .format(detailed_format)
        .write_mode(WriteMode::Direct)
        .start()
        .context("failed to start logger")
}

/// Resolve the log directory inside the user's home.
fn log_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(LOG_DIR_NAME))
}
