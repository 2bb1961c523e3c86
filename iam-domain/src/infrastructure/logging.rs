use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::application::ports::{LogFormat, LoggingConfig};
use crate::domain::errors::{DomainError, DomainResult};

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(config: &LoggingConfig) -> String {
    format!("iam_domain={},warn", config.level)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> DomainResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config).into());
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_ansi(config.enable_colors))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_ansi(config.enable_colors))
            .try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Full => registry
            .with(fmt::layer().with_ansi(config.enable_colors))
            .try_init(),
    };

    result.map_err(|e| DomainError::Configuration {
        message: format!("Failed to install tracing subscriber: {}", e),
    })
}
