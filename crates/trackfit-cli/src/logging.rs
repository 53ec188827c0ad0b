//! Tracing subscriber setup for the `trackfit` binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "trackfit=info";

/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "trackfit=debug";

/// Initializes the global subscriber, writing to stderr.
///
/// `RUST_LOG` always wins over the built-in defaults. Stdout stays reserved
/// for command output so `--json` reports remain machine-readable.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}
