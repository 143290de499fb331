//! Logging configuration for antiform.
//!
//! Diagnostics go to stderr through `tracing` so they never interleave with
//! the game panel on stdout. The storage layer and the effect timers log on
//! every write and tick, so they stay one step quieter than the gameplay
//! modules until `-vv` asks for everything.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Modules that are chatty at debug level: one line per stored value or
/// scheduled cue.
const BACKGROUND_TARGETS: &[&str] = &["antiform::storage", "antiform::effects"];

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress all diagnostics except errors.
    Quiet,
    /// Warnings and above. The game itself is chatty enough.
    #[default]
    Normal,
    /// Page transitions and verdicts; storage and timers at info.
    Verbose,
    /// Everything, including every stored value and timer tick.
    Trace,
}

impl Verbosity {
    /// Level for gameplay modules (pages, controller, tour).
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Level for storage and timer modules.
    #[must_use]
    pub fn background_level(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::INFO,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directives used when `RUST_LOG` is not set.
    #[must_use]
    pub fn directives(&self) -> String {
        let mut directives = vec![format!("antiform={}", self.to_level_filter())];
        directives.extend(
            BACKGROUND_TARGETS
                .iter()
                .map(|target| format!("{target}={}", self.background_level())),
        );
        directives.join(",")
    }
}

/// Initialize the logging system.
///
/// This should be called once at application startup. The logging level can be
/// controlled via:
/// 1. The `verbosity` parameter
/// 2. The `RUST_LOG` environment variable (takes precedence)
///
/// # Examples
///
/// ```no_run
/// use antiform::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .without_time(),
    );

    // Ignore the error if a subscriber is already installed.
    let _ = subscriber.try_init();
}

/// Initialize logging for tests.
///
/// Only warnings and errors, captured per test.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
