//! Structured logging

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Build the filter for `log_level`, falling back to `info` when it does not parse
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize JSON tracing output for the service
///
/// Installing a second subscriber is a no-op, so this is safe to call from
/// tests and from services that set up their own subscriber first.
pub fn init_tracing(config: &Config) -> Result<()> {
    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(&config.service.log_level))
        .try_init();

    match installed {
        Ok(()) => tracing::info!("Tracing initialized for service: {}", config.service.name),
        Err(e) => tracing::debug!("Tracing already initialized: {}", e),
    }

    Ok(())
}

/// Shutdown tracing
pub fn shutdown_tracing() {
    tracing::info!("Tracing shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        let config = Config::default();
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
    }

    #[test]
    fn test_invalid_directive_falls_back() {
        assert_eq!(env_filter("resty=verbose").to_string(), "info");
        assert_eq!(env_filter("resty=debug").to_string(), "resty=debug");
    }
}
