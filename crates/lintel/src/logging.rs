use std::fmt;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Crates whose events are shown at the requested level.
const CRATES: &[&str] = &["lintel", "lintel_core", "lintel_scope", "lintel_syntax", "comments"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Send `tracing` events to stderr.
///
/// `LINTEL_LOG` takes precedence over `level` and accepts the usual
/// `EnvFilter` directives, e.g. `LINTEL_LOG=lintel_core::fix=trace`.
pub fn init_logging(level: LogLevel, no_color: bool) {
    let filter = EnvFilter::try_from_env("LINTEL_LOG").unwrap_or_else(|_| {
        let directives = CRATES
            .iter()
            .map(|name| format!("{name}={level}"))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::new(directives)
    });

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .without_time()
        .try_init();

    // Only fails when a subscriber is already installed.
    if let Err(error) = result {
        tracing::debug!("Logging was already initialized: {error}");
    }
}
