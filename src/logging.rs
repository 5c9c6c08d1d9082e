use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "price-sentinel.log";
pub const DEFAULT_DIRECTIVE: &str = "price_sentinel=info";

/// `RUST_LOG` directives when set and valid, `DEFAULT_DIRECTIVE` otherwise.
pub fn build_filter(rust_log: Option<&str>) -> Result<EnvFilter> {
    let filter = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok());

    match filter {
        Some(filter) => Ok(filter),
        None => Ok(EnvFilter::try_new(DEFAULT_DIRECTIVE)?),
    }
}

/// Installs the global subscriber. `RUST_LOG` replaces the default filter.
///
/// With a log directory, output is also written to a daily rolling file.
/// The returned guard flushes that file and must live until exit.
pub fn init(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref())?;

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .try_init()?;

            Ok(None)
        }
    }
}
