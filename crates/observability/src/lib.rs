//! Tracing and logging setup shared by every binary or host that embeds the
//! dinepos crates.

/// Initialize process-wide tracing from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init(&config::ObservabilityConfig::from_env());
}

/// Environment-driven configuration.
pub mod config;

/// Subscriber installation.
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig};
