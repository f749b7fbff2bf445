//! Tracing subscriber set-up driven by `LoggingConfig`.

use sd_shared::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

use crate::InfrastructureError;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `config.level` when set. Fails if a
/// global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| InfrastructureError::Config(format!("Failed to install tracing subscriber: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, InfrastructureError> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(&config.level),
    }
    .map_err(|e| InfrastructureError::Config(format!("Invalid log filter: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        let config = LoggingConfig {
            level: "sd_core=verbose".to_string(),
            ..LoggingConfig::default()
        };
        if std::env::var(EnvFilter::DEFAULT_ENV).is_err() {
            assert!(matches!(build_filter(&config), Err(InfrastructureError::Config(_))));
        }
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            colored: false,
            source_location: false,
        };
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
