use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::EvaConfig;

pub const LOG_FILE_PREFIX: &str = "eva-client.log";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. With a log directory the output
/// goes to a daily rolling file; keep the returned guard alive until exit so
/// buffered lines are flushed.
pub fn init_tracing(config: &EvaConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| anyhow!("invalid log level {:?}: {}", config.log_level, e))?;

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;
            Ok(None)
        }
    }
}
