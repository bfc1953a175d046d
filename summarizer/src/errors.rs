// text-summarizer/src/errors.rs

use conveyor::ConveyorError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every failure a stage can report. Stage entry methods return this type and
/// the driver hands it back to its caller unchanged.
#[derive(Debug, Error)]
pub enum SummarizerError {
  #[error("I/O error at '{}': {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Invalid YAML in '{}': {source}", path.display())]
  Yaml {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("Invalid JSON in '{}': {source}", path.display())]
  Json {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Download failed: {0}")]
  Download(#[from] reqwest::Error),

  #[error("Archive Error: {0}")]
  Archive(#[from] zip::result::ZipError),

  #[error("Invalid Arrow data in '{}': {source}", path.display())]
  Arrow {
    path: PathBuf,
    #[source]
    source: arrow::error::ArrowError,
  },

  #[error("Tokenizer Error: {0}")]
  Tokenizer(String),

  #[error("Dataset Error: {0}")]
  Dataset(String),

  #[error("Pipeline Error: {source}")]
  Workflow {
    #[from]
    source: ConveyorError,
  },
}

impl SummarizerError {
  /// Builds an `map_err` adapter that attaches `path` to an `io::Error`.
  pub fn io(path: impl AsRef<Path>) -> impl FnOnce(io::Error) -> SummarizerError {
    let path = path.as_ref().to_path_buf();
    move |source| SummarizerError::Io { path, source }
  }

  pub fn json(path: impl AsRef<Path>) -> impl FnOnce(serde_json::Error) -> SummarizerError {
    let path = path.as_ref().to_path_buf();
    move |source| SummarizerError::Json { path, source }
  }

  pub fn arrow(path: impl AsRef<Path>) -> impl FnOnce(arrow::error::ArrowError) -> SummarizerError {
    let path = path.as_ref().to_path_buf();
    move |source| SummarizerError::Arrow { path, source }
  }

  /// The underlying `io::Error`, if this is a filesystem failure.
  pub fn io_source(&self) -> Option<&io::Error> {
    match self {
      SummarizerError::Io { source, .. } => Some(source),
      _ => None,
    }
  }
}

impl From<tokenizers::Error> for SummarizerError {
  fn from(err: tokenizers::Error) -> Self {
    SummarizerError::Tokenizer(err.to_string())
  }
}

pub type Result<T, E = SummarizerError> = std::result::Result<T, E>;
