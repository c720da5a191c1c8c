//! tracing subscriber setup.

use sotoki_core::LoggingConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter for a `-v` count. Without flags, `RUST_LOG` wins, then the
/// configured level.
pub fn filter_for(verbose: u8, config: &LoggingConfig) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Installs the global subscriber, writing to stderr.
pub fn init(verbose: u8, config: &LoggingConfig) {
    fmt()
        .with_env_filter(filter_for(verbose, config))
        .with_target(config.include_target)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}
