//! # Logging
//!
//! One subscriber, installed once at startup:
//! - console output on stderr, filtered by `RUST_LOG` (default: debug for the
//!   promoter crates), text by default or JSON with `PROMOTER_LOG_FORMAT=json`
//! - an error-only log file, appended to on every run
//!
//! Stdout is left to the result line.

use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "promoter=debug,promoter_core=debug";

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Read `PROMOTER_LOG_FORMAT`; anything other than `json` means text.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("PROMOTER_LOG_FORMAT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Open the error log for appending, creating it if needed.
pub fn open_error_log(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Plain-text layer that only lets error events through to `file`.
fn error_file_layer<S>(file: Option<File>) -> Option<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_filter(LevelFilter::ERROR)
    })
}

/// Install the global subscriber.
///
/// If the error log cannot be opened the run continues with console output
/// only, and a warning says so.
pub fn init(format: LogFormat, error_log: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let ansi = std::io::stderr().is_terminal();
    let (file, open_error) = match open_error_log(error_log) {
        Ok(file) => (Some(file), None),
        Err(e) => (None, Some(e)),
    };
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_ansi(false),
                )
                .with(error_file_layer(file))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(ansi),
                )
                .with(error_file_layer(file))
                .init();
        }
    }

    if let Some(e) = open_error {
        tracing::warn!(
            "Cannot open error log '{}': {}. Errors go to the console only.",
            error_log.display(),
            e
        );
    }
}
