//! Logger initialisation for the command-line tool

use crate::io::configuration::{LOG_FILES_KEPT, LOG_ROTATE_BYTES};
use crate::io::error::{Result, invalid_configuration};
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use std::path::Path;

/// Start the global logger
///
/// Logs go to stderr. With `log_dir` set, records are also written to
/// size-rotated files in that directory. The returned handle must be kept
/// alive for the duration of the program so buffered records are flushed.
///
/// # Errors
///
/// Returns `InvalidConfiguration` if the log specification cannot be parsed
/// or the logger cannot be started.
pub fn setup_logging(spec: &str, log_dir: Option<&Path>) -> Result<LoggerHandle> {
    let logger = Logger::try_with_str(spec)
        .map_err(|e| invalid_configuration("log_level", &spec, &e))?;

    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir))
            .duplicate_to_stderr(Duplicate::All)
            .rotate(
                Criterion::Size(LOG_ROTATE_BYTES),
                Naming::Timestamps,
                Cleanup::KeepLogFiles(LOG_FILES_KEPT),
            ),
        None => logger.log_to_stderr(),
    };

    logger.start().map_err(|e| {
        let target = log_dir.map_or_else(|| "<stderr>".to_string(), |d| d.display().to_string());
        invalid_configuration("log_dir", &target, &e)
    })
}
