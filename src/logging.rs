//! File logging. A TUI owns the terminal, so tracing output goes to a daily
//! rolling file under the state directory instead of stderr.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "cadenza.log";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `filter`; `dev` forces `debug`. The returned guard
/// must live until shutdown or buffered lines are lost.
pub fn init_logging(
    dir: &Path,
    filter: &str,
    dev: bool,
) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let fallback = if dev { "debug" } else { filter };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(env_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}
