//! Tracing subscriber setup for applications embedding Sentier

use sentier_core::exception::{Error, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info";

/// Install a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if a global subscriber is already set.
pub fn init_tracing() -> Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer())
		.try_init()
		.map_err(|e| Error::Configuration(format!("failed to install tracing subscriber: {}", e)))
}
