// tests/configuration_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::env;
use std::fs;
use text_summarizer::config::{CONFIG_PATH_ENV, PARAMS_PATH_ENV};
use text_summarizer::{ConfigurationManager, SummarizerError};

#[test]
#[serial]
fn test_from_env_reads_overridden_paths() {
  setup_tracing();
  let ws = Workspace::new();
  let (config_path, params_path) = ws.write_files(None);
  assert!(!ws.artifacts().exists());
  env::set_var(CONFIG_PATH_ENV, &config_path);
  env::set_var(PARAMS_PATH_ENV, &params_path);

  let loaded = ConfigurationManager::from_env();

  env::remove_var(CONFIG_PATH_ENV);
  env::remove_var(PARAMS_PATH_ENV);
  let cm = loaded.unwrap();
  assert_eq!(cm.artifacts_root(), ws.artifacts());
  assert!(ws.artifacts().is_dir());
  assert_eq!(cm.data_transformation_config().vocab_size, 500);
  assert_eq!(cm.model_trainer_config().training.save_steps, 2);
  assert_eq!(
    cm.data_ingestion_config().source_url,
    format!("file://{}", ws.archive.display())
  );
}

#[test]
#[serial]
fn test_missing_params_file_is_an_io_error_naming_the_file() {
  setup_tracing();
  let ws = Workspace::new();
  let (config_path, _) = ws.write_files(None);
  let missing = ws.root().join("nope.yaml");

  let err = ConfigurationManager::new(&config_path, &missing).unwrap_err();

  assert!(matches!(err, SummarizerError::Io { ref path, .. } if *path == missing));
}

#[test]
#[serial]
fn test_malformed_yaml_is_reported_with_its_path() {
  setup_tracing();
  let ws = Workspace::new();
  let (config_path, params_path) = ws.write_files(None);
  fs::write(&config_path, "data_ingestion: [unclosed").unwrap();

  let err = ConfigurationManager::new(&config_path, &params_path).unwrap_err();

  assert!(matches!(err, SummarizerError::Yaml { ref path, .. } if *path == config_path));
}

#[test]
#[serial]
fn test_getters_return_independent_copies() {
  setup_tracing();
  let ws = Workspace::new();
  let cm = ws.config();
  let mut first = cm.data_ingestion_config();
  first.source_url.clear();
  assert!(!cm.data_ingestion_config().source_url.is_empty());
}

#[test]
fn test_repository_config_files_parse() {
  let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
  let cm = ConfigurationManager::new(root.join("config/config.yaml"), root.join("params.yaml")).unwrap();
  assert_eq!(cm.model_trainer_config().training.gradient_accumulation_steps, 16);
  assert_eq!(cm.model_evaluation_config().metric_file_name, std::path::Path::new("artifacts/model_evaluation/metrics.csv"));
}
