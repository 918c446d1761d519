//! Tracing setup for the `hps` binary.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const DEFAULT_LEVEL: &str = "warn";

/// Directive used when `RUST_LOG` is unset: `-v` flags win over the
/// configured level.
fn default_directive(verbose: u8, configured: Option<&str>) -> String {
    match verbose {
        0 => configured
            .filter(|level| !level.trim().is_empty())
            .unwrap_or(DEFAULT_LEVEL)
            .to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn env_filter(verbose: u8, configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = default_directive(verbose, configured);
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    })
}

/// Installs the global subscriber: compact stderr output plus a daily
/// rolling file under `logs_dir` when it can be created.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(
    verbose: u8,
    configured: Option<&str>,
    logs_dir: Option<&Path>,
) -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match logs_dir.and_then(file_appender) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose, configured))
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    guard
}

fn file_appender(logs_dir: &Path) -> Option<RollingFileAppender> {
    fs::create_dir_all(logs_dir).ok()?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("hps")
        .filename_suffix("log")
        .build(logs_dir)
        .ok()
}
