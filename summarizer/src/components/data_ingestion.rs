// text-summarizer/src/components/data_ingestion.rs

use crate::config::DataIngestionConfig;
use crate::errors::{Result, SummarizerError};
use crate::utils::{create_directories, get_size};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Fetches the raw dataset archive and unpacks it.
pub struct DataIngestion {
  config: DataIngestionConfig,
}

impl DataIngestion {
  pub fn new(config: DataIngestionConfig) -> Self {
    Self { config }
  }

  /// Creates the stage directory, downloads the archive and extracts it.
  pub async fn ingest(&self) -> Result<()> {
    create_directories(&[&self.config.root_dir])?;
    self.download_file().await?;
    self.extract_zip_file()
  }

  /// Downloads `source_url` to `local_data_file` unless that file already
  /// exists. `http(s)://` URLs are fetched; `file://` URLs and bare paths are
  /// copied.
  pub async fn download_file(&self) -> Result<()> {
    let target = &self.config.local_data_file;
    if target.exists() {
      tracing::info!("File already exists of size: {} KB", get_size(target)?);
      return Ok(());
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
      create_directories(&[parent])?;
    }

    let url = self.config.source_url.as_str();
    if url.starts_with("http://") || url.starts_with("https://") {
      let response = reqwest::get(url).await?.error_for_status()?;
      let bytes = response.bytes().await?;
      tokio::fs::write(target, &bytes).await.map_err(SummarizerError::io(target))?;
    } else {
      let source = local_source(url);
      tokio::fs::copy(&source, target).await.map_err(SummarizerError::io(&source))?;
    }
    tracing::info!("{} downloaded to {}", url, target.display());
    Ok(())
  }

  /// Extracts every entry of the archive into `unzip_dir`, overwriting files
  /// that already exist. Entries whose path would escape `unzip_dir` are skipped.
  pub fn extract_zip_file(&self) -> Result<()> {
    let unzip_dir = &self.config.unzip_dir;
    create_directories(&[unzip_dir])?;

    let archive_path = &self.config.local_data_file;
    let file = File::open(archive_path).map_err(SummarizerError::io(archive_path))?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
      let mut entry = archive.by_index(i)?;
      let Some(relative) = entry.enclosed_name() else {
        tracing::warn!(entry = entry.name(), "Skipping archive entry with an unsafe path");
        continue;
      };
      let out_path = unzip_dir.join(relative);

      if entry.is_dir() {
        create_directories(&[&out_path])?;
        continue;
      }
      if let Some(parent) = out_path.parent() {
        create_directories(&[parent])?;
      }
      let mut out = File::create(&out_path).map_err(SummarizerError::io(&out_path))?;
      io::copy(&mut entry, &mut out).map_err(SummarizerError::io(&out_path))?;
    }
    tracing::info!("Extracted {} entries into {}", archive.len(), unzip_dir.display());
    Ok(())
  }
}

fn local_source(url: &str) -> PathBuf {
  match url.strip_prefix("file://") {
    Some(path) => PathBuf::from(path),
    None => Path::new(url).to_path_buf(),
  }
}
