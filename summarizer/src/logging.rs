// text-summarizer/src/logging.rs

//! Global tracing setup for the binary: one formatter on stdout and one
//! appending plain-text lines to `<log dir>/running_logs.log`.

use crate::errors::{Result, SummarizerError};
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_DIR_ENV: &str = "SUMMARIZER_LOG_DIR";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "running_logs.log";

pub fn log_file_path() -> PathBuf {
  let dir = env::var(LOG_DIR_ENV).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
  PathBuf::from(dir).join(LOG_FILE_NAME)
}

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// filter.
pub fn init() -> Result<PathBuf> {
  let path = log_file_path();
  if let Some(dir) = path.parent() {
    std::fs::create_dir_all(dir).map_err(SummarizerError::io(dir))?;
  }
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(&path)
    .map_err(SummarizerError::io(&path))?;

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_target(true))
    .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
    .try_init()
    .map_err(|e| SummarizerError::Config(format!("cannot install log subscriber: {}", e)))?;
  Ok(path)
}
