//! Subscriber setup: stdout plus an optional dated log file.

use crate::{CliError, Result};
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file for `date` under `root`
pub fn log_file_path(root: &Path, date: NaiveDate) -> PathBuf {
    root.join("logging")
        .join(format!("compass_enrich_{}.log", date.format("%Y-%m-%d")))
}

/// Install the global subscriber
///
/// `RUST_LOG` selects levels, `info` by default. With a log root, records
/// are also appended to today's file there.
pub fn init(log_root: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, file_path) = match log_root {
        Some(root) => {
            let path = log_file_path(root, chrono::Local::now().date_naive());
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    Ok(file_path)
}
