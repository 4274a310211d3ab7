// ABOUTME: Tracing setup — EnvFilter from MEET_LOG or the config level, to stderr or a log file.
// ABOUTME: The terminal UI logs to a file so log lines never land on the alternate screen.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides `[logging].level`.
pub const LOG_ENV: &str = "MEET_LOG";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    /// Append to `meet.log` inside the given directory.
    File(&'a Path),
}

/// Build the filter: `MEET_LOG` when set and valid, else `fallback`, else `info`.
pub fn filter(fallback: &str) -> EnvFilter {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(f) => f,
        Err(_) => match fallback.parse::<EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: log level '{}' is not a valid tracing filter ({}); falling back to 'info'",
                    fallback, e
                );
                EnvFilter::new("info")
            }
        },
    }
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the program so buffered file output is flushed on exit.
pub fn init(level: &str, target: LogTarget<'_>) -> anyhow::Result<Option<WorkerGuard>> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter(level));
    match target {
        LogTarget::Stderr => {
            builder
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))?;
            Ok(None)
        }
        LogTarget::File(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, "meet.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))?;
            Ok(Some(guard))
        }
    }
}
