//! Logging initialisation.
//!
//! Console output goes to stderr so stdout stays free for solutions. An
//! optional log file receives the same events plus every interaction log
//! written by [`crate::interaction::TracingLogSink`], whatever the level.

use crate::interaction::INTERACTION_TARGET;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Timestamp format for log lines.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set.
    pub level: Level,
    /// Directory for the log file; console only when `None`.
    pub log_dir: Option<PathBuf>,
    /// Log file name inside `log_dir`.
    pub log_file_name: String,
    /// Colorize console output.
    pub colorize: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            log_dir: None,
            log_file_name: "solver.log".to_string(),
            colorize: true,
        }
    }
}

/// Keeps the file writer alive; drop it only at shutdown.
#[derive(Debug)]
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Subscriber assembled by [`build_subscriber`].
type LogSubscriber = Layered<Vec<Box<dyn Layer<Registry> + Send + Sync>>, Registry>;

/// Installs the global subscriber.
///
/// Initialisation failures (for example a subscriber already being set)
/// are ignored so tests and embedders can call this repeatedly.
#[must_use]
pub fn init_logging(config: &LoggingConfig) -> LogGuard {
    let (subscriber, guard, dir_error) = build_subscriber(config);
    let _ = subscriber.try_init();

    if let Some((dir, error)) = dir_error {
        tracing::warn!(dir = %dir.display(), %error, "cannot create log directory");
    }
    guard
}

/// Directives from `RUST_LOG`, or the crate targets at `config.level`.
fn directives(config: &LoggingConfig) -> String {
    std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| {
            format!("theoryx_rs={level},theoryx={level}", level = config.level)
        })
}

/// Builds the subscriber without installing it.
///
/// The file layer always records interaction logs at INFO; the console
/// follows the configured level only.
fn build_subscriber(
    config: &LoggingConfig,
) -> (LogSubscriber, LogGuard, Option<(PathBuf, std::io::Error)>) {
    let directives = directives(config);
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(config.colorize)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_filter(EnvFilter::builder().parse_lossy(&directives))
        .boxed();
    layers.push(console_layer);

    let mut file_guard = None;
    let mut dir_error = None;
    if let Some(log_dir) = &config.log_dir {
        match std::fs::create_dir_all(log_dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::never(log_dir, &config.log_file_name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                file_guard = Some(guard);
                let file_filter = EnvFilter::builder()
                    .parse_lossy(format!("{directives},{INTERACTION_TARGET}=info"));
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer)
                        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                        .with_filter(file_filter)
                        .boxed(),
                );
            }
            Err(e) => dir_error = Some((log_dir.clone(), e)),
        }
    }

    let subscriber = tracing_subscriber::registry().with(layers);
    let guard = LogGuard {
        _file_guard: file_guard,
    };
    (subscriber, guard, dir_error)
}

/// Maps the CLI verbosity flag to a level.
#[must_use]
pub const fn level_for(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}
