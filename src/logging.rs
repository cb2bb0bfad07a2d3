//! Diagnostic logging for the binary.
//!
//! The library only emits `tracing` events; this installs a subscriber that
//! writes them to stderr so they never mix with the report on stdout.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding an `EnvFilter` directive, e.g. `arranger=debug`.
pub const LOG_ENV: &str = "ARRANGER_LOG";

/// Installs the global subscriber.
///
/// `ARRANGER_LOG` wins when set; otherwise `verbose` selects `debug` and the
/// default is `warn`. Calling this twice is harmless.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter_layer =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter_layer)
        .try_init();
}
