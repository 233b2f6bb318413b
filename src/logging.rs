//! # Tracing Module
//!
//! Environment-aware console logging using the tracing ecosystem.
//! Designed for containerized deployments where logs go to stdout/stderr and
//! are collected by the platform.
//!
//! This module provides:
//! - Console-only structured logging (container-friendly)
//! - `RUST_LOG`-based level configuration (defaults to `info`)
//! - JSON output for log aggregation via `RELAY_LOG_FORMAT=json`
//! - TTY-aware ANSI color output

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; only the first call installs a subscriber.
/// Binaries call this before any other work so that bootstrap logging is
/// captured.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let json_output = std::env::var("RELAY_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if json_output {
            let json_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(false)
                .with_filter(filter);

            tracing_subscriber::registry().with(json_layer).init();
        } else {
            let use_ansi = std::io::stdout().is_terminal();

            let console_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .with_filter(filter);

            tracing_subscriber::registry().with(console_layer).init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
