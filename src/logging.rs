//! Tracing setup for the binary.
//!
//! Events always go to stderr so command output on stdout stays clean. With
//! `LogSettings::file_dir` set, a second layer writes plain-text events to a
//! daily rolling `vocab-srs.log` there.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogSettings;

const LOG_FILE_PREFIX: &str = "vocab-srs.log";
const FALLBACK_FILTER: &str = "info";

/// Flushes the file writer on drop; hold it until the end of `main`.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn file_writer(dir: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

pub fn init_tracing(settings: &LogSettings) -> Option<FileLogGuard> {
    let (filter, unrecognised_level) = match EnvFilter::try_new(&settings.level) {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new(FALLBACK_FILTER), true),
    };

    // no subscriber exists yet, so a failure here can only be reported on stderr
    let file = settings.file_dir.as_deref().and_then(|dir| match file_writer(dir) {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("file logging disabled, cannot use {}: {err}", dir.display());
            None
        }
    });
    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(FileLogGuard { _guard: guard }),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();

    if unrecognised_level {
        tracing::warn!(level = %settings.level, "unrecognised log filter, using {FALLBACK_FILTER}");
    }
    guard
}
