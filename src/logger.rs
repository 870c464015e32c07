//! Diagnostic logging for harness binaries.
//!
//! Progress lines go to the reporter's sink; these logs go to stderr.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "TRIAL_LOG";

/// The filter used when `TRIAL_LOG` is unset.
pub fn default_directive(verbose: bool) -> String {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    format!("trial={}", level)
}

/// Install the global subscriber. Does nothing if one is already set.
pub fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
