// src/infra/logger.rs — Structured logging with tracing

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging. COPYBLOOM_LOG takes precedence, then RUST_LOG, then
/// the given default level.
pub fn init_logging(level: &str) {
    fmt()
        .with_env_filter(filter_from_env(level))
        .with_target(false)
        .compact()
        .init();
}

fn filter_from_env(level: &str) -> EnvFilter {
    if let Ok(custom) = std::env::var("COPYBLOOM_LOG") {
        if !custom.is_empty() {
            return EnvFilter::new(custom);
        }
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
