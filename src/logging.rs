use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{AppConfig, LogFormat};

/// Install the global subscriber. `RUST_LOG` wins over `LOG_LEVEL`.
///
/// Calling this twice is harmless; the second call keeps the first subscriber.
pub fn init_subscriber(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let result = match config.log_format {
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => Registry::default()
            .with(filter)
            .with(fmt::layer().pretty())
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
