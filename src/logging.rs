//! Process-wide tracing subscriber.
//!
//! `log` records from the store and services are bridged into the same subscriber,
//! so one filter governs everything.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

static INSTALLED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    Filter { filter: String, reason: String },

    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Build the filter: `RUST_LOG` wins over the configured directive.
pub fn env_filter(fallback: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback).map_err(|e| LoggingError::Filter {
            filter: fallback.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Install the global subscriber. Returns `Ok(false)` if one was already installed
/// by an earlier call. A failed call leaves nothing installed, so it can be retried.
pub fn init_logging(filter: &str, format: LogFormat) -> Result<bool, LoggingError> {
    if INSTALLED.load(Ordering::SeqCst) {
        return Ok(false);
    }

    let filter = env_filter(filter)?;
    let installed = match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .flatten_event(true)
            .try_init(),
    };
    installed.map_err(|e| LoggingError::Install(e.to_string()))?;
    INSTALLED.store(true, Ordering::SeqCst);

    log::debug!("Logging initialized ({:?})", format);
    Ok(true)
}
