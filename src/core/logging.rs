//! Logging configuration and initialization
//!
//! This module sets up the tracing subscriber for structured logging
//! throughout the application.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system with the specified level
///
/// Sets up tracing with a filter based on the provided log level.
/// If the log level is invalid, defaults to "info". A RUST_LOG
/// environment variable overrides the configured level.
///
/// # Arguments
///
/// * `log_level` - The log level string (trace, debug, info, warn, error)
pub fn init_logging(log_level: &str) {
    let level = log_level.trim().to_lowercase();

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    let final_level = if valid_levels.contains(&level.as_str()) {
        level.as_str()
    } else {
        "info"
    };

    // Create the environment filter
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(final_level));

    // Initialize the tracing subscriber
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
