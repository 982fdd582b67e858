//! File logging.  The terminal belongs to the calendar while it runs, so log
//! records go to rotating files in the log directory instead.
use crate::config::LogConfig;
use anyhow::Context;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

const LOG_FILE_BASENAME: &str = "notecal";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

/// Starts the file logger.  Returns `None` when there is no log directory to
/// write to.  The returned handle must be kept alive until the program exits
/// so that buffered records are flushed.
pub(crate) fn init(config: &LogConfig) -> anyhow::Result<Option<LoggerHandle>> {
    let Some(dir) = &config.dir else {
        return Ok(None);
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let handle = Logger::try_with_str(&config.level)
        .with_context(|| format!("invalid log level {:?}", config.level))?
        .log_to_file(
            FileSpec::default()
                .directory(dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;
    info!(
        "event=app_start platform={} version={} level={} log_dir={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        config.level,
        dir.display()
    );
    Ok(Some(handle))
}
