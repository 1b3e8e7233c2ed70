// src/logging.rs

use crate::config::get_config;
use crate::errors::{JobchatError, JobchatResult};
use flexi_logger::{FileSpec, Logger, LoggerHandle};

/// Starts the file logger. Log level comes from the config; output goes to
/// a `jobchat.log` next to the config so the TUI never writes to stdout.
/// The handle must stay alive for the lifetime of the program.
pub fn initialize_logging() -> JobchatResult<LoggerHandle> {
    let config = get_config();

    let log_dir = dirs::home_dir()
        .ok_or_else(|| JobchatError::config_error("Could not determine home directory"))?
        .join(".config")
        .join("jobchat");

    Logger::try_with_str(&config.log_level)
        .map_err(|e| JobchatError::config_error(format!("Invalid log level: {}", e)))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename("jobchat")
                .suppress_timestamp(),
        )
        .append()
        .start()
        .map_err(|e| JobchatError::config_error(format!("Failed to start logger: {}", e)))
}
