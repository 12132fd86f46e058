//! Logging setup for the meetslot binaries.
//!
//! Everything logs through `tracing` macros; this module only installs the
//! subscriber. `RUST_LOG` is honoured, and the configured level is added as a
//! directive for all `meetslot*` targets on top of it. Console output goes to
//! stderr so the CLI's stdout stays clean.

use meetslot_config::LoggingConfig;
use std::str::FromStr;
use tracing::{info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps the background file writer alive. Drop it only when the process exits,
/// otherwise buffered lines are lost.
#[must_use]
pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

/// Initialize the tracing subscriber at INFO.
///
/// # Examples
///
/// ```
/// use meetslot_common::logging;
///
/// let _guard = logging::init();
/// ```
pub fn init() -> LogGuard {
    init_with_level(Level::INFO)
}

/// Initialize the tracing subscriber with a specific log level, console only.
pub fn init_with_level(level: Level) -> LogGuard {
    install(level, None)
}

/// Initialize from the `[logging]` section of the configuration.
///
/// An unparsable level falls back to INFO with a warning.
pub fn init_from_config(config: &LoggingConfig) -> LogGuard {
    let requested = config.level.as_deref().unwrap_or("info");
    let level = Level::from_str(requested).ok();
    let guard = install(level.unwrap_or(Level::INFO), config.directory.as_deref());
    if level.is_none() {
        warn!("Unknown log level '{}', using INFO", requested);
    }
    guard
}

fn install(level: Level, directory: Option<&str>) -> LogGuard {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("meetslot={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "meetslot.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    // try_init: a subscriber may already be installed (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(file_layer)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
    LogGuard(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_does_not_panic() {
        let _first = init_with_level(Level::DEBUG);
        let _second = init_from_config(&LoggingConfig {
            level: Some("not-a-level".to_string()),
            directory: None,
        });
    }
}
