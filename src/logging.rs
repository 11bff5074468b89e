use tracing_appender::non_blocking::WorkerGuard;

use crate::config::Config;

/// File name of the log written inside the configured log directory.
pub const LOG_FILE_NAME: &str = "mazepath.log";

/// Set up file logging if a log directory is configured.
///
/// The terminal is in raw mode on the alternate screen while the app runs, so logs never go
/// to stdout or stderr. The returned guard flushes pending lines when dropped and must be
/// kept alive for as long as logging is needed.
pub fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let log_dir = config.log_dir.as_ref()?;
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let result = tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_thread_names(true)
        .with_max_level(config.log_level)
        .try_init();

    match result {
        Ok(()) => {
            tracing::info!(
                "[logging] writing {} logs to {}",
                config.log_level,
                log_dir.join(LOG_FILE_NAME).display()
            );
            Some(guard)
        }
        // A global subscriber is already installed, keep using it
        Err(_) => None,
    }
}
