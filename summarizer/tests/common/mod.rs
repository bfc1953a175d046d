// tests/common/mod.rs
#![allow(dead_code)]

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::ipc::writer::StreamWriter;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc, Mutex,
};
use tempfile::TempDir;
use text_summarizer::data::{read_jsonl, DialogueRecord};
use text_summarizer::{ConfigurationManager, Result, Stage, SummarizerError};
use tracing::Level;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const SPLITS: [&str; 3] = ["train.jsonl", "validation.jsonl", "test.jsonl"];

pub fn fixture_dir() -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/samsum")
}

/// Zips the fixture splits under `samsum_dataset/`, the layout of the real
/// archive.
pub fn write_fixture_zip(dest: &Path) -> PathBuf {
  let file = File::create(dest).unwrap();
  let mut writer = ZipWriter::new(file);
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
  writer.add_directory("samsum_dataset/", options).unwrap();
  for split in SPLITS {
    let bytes = fs::read(fixture_dir().join(split)).unwrap();
    writer.start_file(format!("samsum_dataset/{split}"), options).unwrap();
    writer.write_all(&bytes).unwrap();
  }
  writer.finish().unwrap();
  dest.to_path_buf()
}

fn arrow_stream(rows: &[DialogueRecord]) -> Vec<u8> {
  let schema = Arc::new(Schema::new(vec![
    Field::new("id", DataType::Utf8, false),
    Field::new("dialogue", DataType::Utf8, false),
    Field::new("summary", DataType::Utf8, false),
  ]));
  let column = |f: fn(&DialogueRecord) -> &str| -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
  };
  let batch = RecordBatch::try_new(
    schema.clone(),
    vec![column(|r| r.id.as_str()), column(|r| r.dialogue.as_str()), column(|r| r.summary.as_str())],
  )
  .unwrap();
  let mut writer = StreamWriter::try_new(Vec::new(), &schema).unwrap();
  writer.write(&batch).unwrap();
  writer.into_inner().unwrap()
}

/// Zips the fixture splits as a saved dataset: `dataset_dict.json` plus one
/// Arrow stream shard per split directory.
pub fn write_saved_dataset_zip(dest: &Path) -> PathBuf {
  let file = File::create(dest).unwrap();
  let mut writer = ZipWriter::new(file);
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
  writer.start_file("samsum_dataset/dataset_dict.json", options).unwrap();
  writer.write_all(br#"{"splits": ["train", "validation", "test"]}"#).unwrap();
  for split in SPLITS {
    let rows: Vec<DialogueRecord> = read_jsonl(&fixture_dir().join(split), None).unwrap();
    let name = split.trim_end_matches(".jsonl");
    writer.start_file(format!("samsum_dataset/{name}/data-00000-of-00001.arrow"), options).unwrap();
    writer.write_all(&arrow_stream(&rows)).unwrap();
    writer.start_file(format!("samsum_dataset/{name}/state.json"), options).unwrap();
    writer.write_all(b"{}").unwrap();
  }
  writer.finish().unwrap();
  dest.to_path_buf()
}

/// A temp directory holding the fixture archive, both YAML files and every
/// artifact a run produces.
pub struct Workspace {
  pub dir: TempDir,
  pub archive: PathBuf,
}

impl Workspace {
  pub fn new() -> Self {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_fixture_zip(&dir.path().join("summarizer-data.zip"));
    Self { dir, archive }
  }

  pub fn with_saved_dataset() -> Self {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_saved_dataset_zip(&dir.path().join("summarizer-data.zip"));
    Self { dir, archive }
  }

  pub fn root(&self) -> &Path {
    self.dir.path()
  }

  pub fn artifacts(&self) -> PathBuf {
    self.root().join("artifacts")
  }

  pub fn raw_dataset_dir(&self) -> PathBuf {
    self.artifacts().join("data_ingestion/samsum_dataset")
  }

  pub fn tokenized_dataset_dir(&self) -> PathBuf {
    self.artifacts().join("data_transformation/samsum_dataset")
  }

  pub fn tokenizer_file(&self) -> PathBuf {
    self.artifacts().join("data_transformation/tokenizer/tokenizer.json")
  }

  pub fn model_file(&self) -> PathBuf {
    self.artifacts().join("model_trainer/summarizer-model/model.json")
  }

  pub fn metrics_file(&self) -> PathBuf {
    self.artifacts().join("model_evaluation/metrics.csv")
  }

  /// config.yaml text with every path rooted in the workspace.
  /// `transformation_root` replaces the transformation stage's `root_dir`.
  pub fn config_yaml(&self, transformation_root: Option<&Path>) -> String {
    let a = self.artifacts();
    let a = a.display();
    let transformation_root = transformation_root
      .map(|p| p.display().to_string())
      .unwrap_or_else(|| format!("{a}/data_transformation"));
    format!(
      r#"artifacts_root: {a}
data_ingestion:
  root_dir: {a}/data_ingestion
  source_URL: file://{archive}
  local_data_file: {a}/data_ingestion/data.zip
  unzip_dir: {a}/data_ingestion
data_transformation:
  root_dir: {transformation_root}
  data_path: {a}/data_ingestion/samsum_dataset
model_trainer:
  root_dir: {a}/model_trainer
  data_path: {a}/data_transformation/samsum_dataset
  tokenizer_path: {a}/data_transformation/tokenizer
  model_name: summarizer-model
model_evaluation:
  root_dir: {a}/model_evaluation
  data_path: {a}/data_transformation/samsum_dataset
  model_path: {a}/model_trainer/summarizer-model
  tokenizer_path: {a}/model_trainer/tokenizer
  metric_file_name: {a}/model_evaluation/metrics.csv
"#,
      archive = self.archive.display(),
    )
  }

  pub fn write_files(&self, transformation_root: Option<&Path>) -> (PathBuf, PathBuf) {
    let config_path = self.root().join("config.yaml");
    let params_path = self.root().join("params.yaml");
    fs::write(&config_path, self.config_yaml(transformation_root)).unwrap();
    fs::write(&params_path, PARAMS_YAML).unwrap();
    (config_path, params_path)
  }

  pub fn config(&self) -> Arc<ConfigurationManager> {
    let (config_path, params_path) = self.write_files(None);
    Arc::new(ConfigurationManager::new(config_path, params_path).unwrap())
  }

  pub fn config_with_transformation_root(&self, root: &Path) -> Arc<ConfigurationManager> {
    let (config_path, params_path) = self.write_files(Some(root));
    Arc::new(ConfigurationManager::new(config_path, params_path).unwrap())
  }
}

/// Hyperparameters small enough for the 10-row fixture.
pub const PARAMS_YAML: &str = r#"Tokenization:
  vocab_size: 500
  max_input_length: 256
  max_target_length: 64

TrainingArguments:
  num_train_epochs: 2
  warmup_steps: 2
  per_device_train_batch_size: 2
  weight_decay: 0.01
  logging_steps: 1
  evaluation_strategy: epoch
  eval_steps: 1
  save_steps: 2
  gradient_accumulation_steps: 1
  learning_rate: 0.5
  seed: 42

Generation:
  num_samples: 10
  batch_size: 2
  max_length: 32
  length_penalty: 0.8
"#;

/// Stage double that records its name and optionally fails.
pub struct RecordingStage {
  pub name: &'static str,
  pub calls: Arc<AtomicUsize>,
  pub journal: Arc<Mutex<Vec<&'static str>>>,
  pub fail_with: Option<&'static str>,
}

impl RecordingStage {
  pub fn new(name: &'static str, journal: Arc<Mutex<Vec<&'static str>>>) -> Self {
    Self {
      name,
      calls: Arc::new(AtomicUsize::new(0)),
      journal,
      fail_with: None,
    }
  }

  pub fn failing(mut self, message: &'static str) -> Self {
    self.fail_with = Some(message);
    self
  }

  pub fn call_count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Stage for RecordingStage {
  fn name(&self) -> &'static str {
    self.name
  }

  async fn run(&self, _config: &ConfigurationManager) -> Result<()> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.journal.lock().unwrap().push(self.name);
    match self.fail_with {
      Some(message) => Err(SummarizerError::Dataset(message.to_string())),
      None => Ok(()),
    }
  }
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
