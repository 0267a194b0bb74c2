//! Diagnostic logging for the command line tool
//!
//! Engine modules emit `tracing` events; this installs the subscriber that
//! prints them. User-facing output goes through [crate::ui] instead.

use crate::error::{ReleaseError, Result};
use std::io;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive (e.g. `git_release=debug`)
pub const LOG_ENV: &str = "GIT_RELEASE_LOG";

/// Level used when `GIT_RELEASE_LOG` is unset
pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Build the event filter from the environment, falling back to the
/// verbosity-derived level
pub fn env_filter(verbose: bool) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .map_err(|e| ReleaseError::config(format!("Invalid {} value: {}", LOG_ENV, e))),
        _ => Ok(EnvFilter::new(default_level(verbose))),
    }
}

/// Install the global subscriber, writing compact lines to stderr
pub fn init(verbose: bool) -> Result<()> {
    let filter = env_filter(verbose)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| ReleaseError::config(format!("Failed to initialize logging: {}", e)))
}
