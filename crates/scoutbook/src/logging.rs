//! Tracing setup for the binary and for tests.
//!
//! Log lines always go to stderr; stdout belongs to command output.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the binary logs, chosen with `-q` / `-v` / `-vv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and errors, such as discarded corrupt records.
    #[default]
    Normal,
    /// Adds state transitions and every store write.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// The maximum level logged for the `scoutbook` target.
    #[must_use]
    pub fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::WARN,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directive(self) -> String {
        format!("scoutbook={}", self.level())
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `verbosity` when set. Calling this again after a
/// subscriber is installed does nothing.
///
/// # Examples
///
/// ```no_run
/// use scoutbook::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity >= Verbosity::Verbose)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

/// Route logs through the test harness so they show up for failing tests.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("scoutbook=debug")
        .with_test_writer()
        .try_init();
}
