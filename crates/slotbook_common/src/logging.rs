//! Logging utilities for the Slotbook application.
//!
//! Every crate logs through `tracing` macros; the binary calls one of the
//! `init*` functions once at startup to install the subscriber.

use std::path::Path;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives still apply; `level` only sets the default for the
/// `slotbook*` targets.
pub fn init_with_level(level: Level) {
    // Nothing to flush without a file layer, so the guard is not needed.
    let _ = install(level, None);
}

/// Initialize the tracing subscriber and additionally write logs to a daily
/// rolling file `slotbook.log.<date>` in `directory`.
///
/// The returned guard flushes the background writer when dropped, so the binary
/// must hold it for the lifetime of the process.
pub fn init_with_file(level: Level, directory: impl AsRef<Path>) -> Option<WorkerGuard> {
    install(level, Some(directory.as_ref()))
}

/// Parses a level name from configuration, falling back to INFO.
pub fn parse_level(level: Option<&str>) -> Level {
    level
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

fn install(level: Level, directory: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match format!("slotbook={}", level).parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };

    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "slotbook.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // try_init: a global default subscriber may already be set (tests, embedding).
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(file_layer)
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
    guard
}
