use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The TUI owns stdout, so logs go to a file under the cache dir
pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("lazyimport").join("lazyimport.log"))
}

/// Install a JSON file subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) -> Result<PathBuf> {
    let path = log_path().context("No cache directory for the log file")?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("lazyimport={level}")))
        .context("Invalid log level")?;

    let layer = fmt::layer()
        .json()
        .with_writer(std::sync::Mutex::new(file))
        .with_current_span(false)
        .with_span_list(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("Logging already initialized")?;

    Ok(path)
}
