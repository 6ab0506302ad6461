//! Tracing subscriber installation.

use std::sync::OnceLock;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_FILTER: &str = "info";

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),

    /// Another global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs a formatted, filtered tracing subscriber.
///
/// The filter comes from `filter`, then `RUST_LOG`, then `info`. Calling
/// this again after a successful installation does nothing.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a different
/// global subscriber was installed first.
pub fn init_tracing(filter: Option<&str>) -> Result<(), TelemetryError> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let directive = filter
        .map(str::to_owned)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned());
    let env_filter = EnvFilter::try_new(directive)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;

    INIT.get_or_init(|| ());
    Ok(())
}
