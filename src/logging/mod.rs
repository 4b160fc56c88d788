//! Logging setup
//!
//! Logs go to stderr through a `tracing-subscriber` fmt layer. With
//! `--log-file` they are also written to a daily file under
//! ~/.config/fontmerge/logs/.

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "fontmerge.log";

/// Get the path to the fontmerge config directory
pub fn config_dir() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
    config_dir.join("fontmerge")
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Get the path of today's log file
pub fn current_log_file() -> PathBuf {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d");
    logs_dir().join(format!("{LOG_FILE_PREFIX}.{timestamp}"))
}

/// Initialize the logs directory
pub fn initialize_logs_directory() -> anyhow::Result<()> {
    fs::create_dir_all(logs_dir())?;
    Ok(())
}

/// Filter directives for a plain level name; noisy dependencies stay at warn.
pub fn filter_directives(level: &str) -> String {
    format!("fontmerge={level},norad=warn")
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. The returned guard flushes the
/// log file when dropped and must be kept alive for the program's duration.
pub fn init_logging(level: &str, log_to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directives(level)))?;

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if !log_to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()?;
        return Ok(None);
    }

    initialize_logs_directory()?;
    let appender = tracing_appender::rolling::daily(logs_dir(), LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        "=== fontmerge started at {} ===",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    tracing::info!("Logs written to: {}", current_log_file().display());
    Ok(Some(guard))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_paths_live_in_config_dir() {
        assert!(logs_dir().starts_with(config_dir()));
        let file_name = current_log_file()
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap();
        assert!(file_name.starts_with("fontmerge.log."));
    }

    #[test]
    fn level_becomes_crate_directive() {
        assert_eq!(filter_directives("debug"), "fontmerge=debug,norad=warn");
        assert!(EnvFilter::try_new(filter_directives("warn")).is_ok());
    }

    #[test]
    fn captured_logs_only_see_this_thread() {
        let (logs, guard) = capture::capture_logs();
        tracing::warn!("visible");
        drop(guard);
        tracing::warn!("after guard");
        assert!(logs.contents().contains("visible"));
        assert!(!logs.contents().contains("after guard"));
    }
}
