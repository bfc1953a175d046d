// text-summarizer/src/utils.rs

//! Small filesystem helpers shared by the configuration layer and the components.

use crate::errors::{Result, SummarizerError};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
  let text = fs::read_to_string(path).map_err(SummarizerError::io(path))?;
  let value = serde_yaml::from_str(&text).map_err(|source| SummarizerError::Yaml {
    path: path.to_path_buf(),
    source,
  })?;
  tracing::info!("yaml file: {} loaded successfully", path.display());
  Ok(value)
}

pub fn create_directories<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
  for path in paths {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(SummarizerError::io(path))?;
    tracing::debug!("created directory at: {}", path.display());
  }
  Ok(())
}

/// Size of a file in whole kilobytes, rounded.
pub fn get_size(path: &Path) -> Result<u64> {
  let bytes = fs::metadata(path).map_err(SummarizerError::io(path))?.len();
  Ok((bytes + 512) / 1024)
}

/// Writes `contents` to `path`, creating parent directories first.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    create_directories(&[parent])?;
  }
  fs::write(path, contents).map_err(SummarizerError::io(path))
}
