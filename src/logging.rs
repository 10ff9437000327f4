//! Tracing setup. One-shot commands log to stderr; the dashboard owns the
//! terminal, so its logs go to a file instead.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the data directory
pub const LOG_FILE: &str = "usagemon.log";

/// Where log lines are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    /// Directory holding [`LOG_FILE`]
    File(PathBuf),
    Discard,
}

impl LogDestination {
    /// Pick the destination for the given mode.
    ///
    /// `data_dir` is the per-user data directory, if one exists.
    pub fn select(interactive: bool, data_dir: Option<PathBuf>) -> Self {
        if !interactive {
            return LogDestination::Stderr;
        }
        match data_dir {
            Some(dir) => LogDestination::File(dir.join("usagemon")),
            None => LogDestination::Discard,
        }
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered lines reach the file.
pub fn init(debug: bool, interactive: bool) -> Option<WorkerGuard> {
    let destination = LogDestination::select(interactive, dirs::data_local_dir());
    let registry = tracing_subscriber::registry().with(filter(debug));

    match destination {
        LogDestination::Stderr => {
            registry
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
            None
        }
        LogDestination::File(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(LOG_FILE)
                .build(&dir);
            match appender {
                Ok(appender) => {
                    let (writer, guard) = tracing_appender::non_blocking(appender);
                    registry
                        .with(
                            fmt::layer()
                                .with_target(false)
                                .with_ansi(false)
                                .with_writer(writer),
                        )
                        .init();
                    Some(guard)
                }
                // Unwritable data dir: stay silent rather than draw over the UI
                Err(_) => {
                    registry.with(fmt::layer().with_writer(std::io::sink)).init();
                    None
                }
            }
        }
        LogDestination::Discard => {
            registry.with(fmt::layer().with_writer(std::io::sink)).init();
            None
        }
    }
}

fn filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("usagemon=debug,usagemon_core=debug")
    } else {
        EnvFilter::new("usagemon=info,usagemon_core=info")
    }
}
