//! Per-run logging context.
//!
//! The engine only emits `tracing` events. Callers pick a [`Verbosity`] and
//! run the conversion inside [`scoped`], which installs a subscriber for
//! the current thread only. Nothing here touches a process-global default.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the run should log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Warnings and errors only
    Quiet,
    /// Run milestones and the final summary
    #[default]
    Normal,
    /// Every skipped and processed file
    Debug,
    /// Everything, including walker internals
    Trace,
}

impl Verbosity {
    /// Derives the verbosity from command-line style flags.
    ///
    /// `quiet` wins over everything else. `debug` counts as one `-v`.
    #[must_use]
    pub fn from_flags(quiet: bool, debug: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }

        match verbose.saturating_add(u8::from(debug)) {
            0 => Self::Normal,
            1 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Filter directive for this crate's events.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "git2txt=warn",
            Self::Normal => "git2txt=info",
            Self::Debug => "git2txt=debug",
            Self::Trace => "git2txt=trace",
        }
    }
}

/// Builds a stderr subscriber for the given verbosity.
#[must_use]
pub fn subscriber(verbosity: Verbosity) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::registry()
        .with(EnvFilter::new(verbosity.directive()))
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
}

/// Runs `f` with a subscriber for `verbosity` installed on this thread.
pub fn scoped<T>(verbosity: Verbosity, f: impl FnOnce() -> T) -> T {
    tracing::subscriber::with_default(subscriber(verbosity), f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, true, 0), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false, 1), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, true, 1), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(false, false, u8::MAX), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(true, true, 3), Verbosity::Quiet);
    }

    #[test]
    fn test_directives() {
        assert_eq!(Verbosity::Normal.directive(), "git2txt=info");
        assert_eq!(Verbosity::Quiet.directive(), "git2txt=warn");
    }

    #[test]
    fn test_scoped_returns_value() {
        let value = scoped(Verbosity::Quiet, || {
            tracing::info!("not shown");
            42
        });
        assert_eq!(value, 42);
    }
}
