//! Logging bootstrap.
//!
//! Levels come from `BOX_LOG` (e.g. `debug`, `boxclean_core=debug`), default `info`.

use std::sync::Once;

use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_LEVEL_ENV: &str = "BOX_LOG";

static INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// JSON lines, for log pipelines.
    Json,
    #[default]
    Pretty,
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(LogFormat::Pretty);
        init_logging(LogFormat::Json);
        tracing::info!("logging initialised");
    }
}
