// text-summarizer/src/config/entity.rs

//! Typed views of the YAML files. The raw file shapes (`*Section`, `Params`) are
//! deserialized once; the per-stage `*Config` structs are what components own.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// --- config.yaml ---

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
  pub artifacts_root: PathBuf,
  pub data_ingestion: DataIngestionSection,
  pub data_transformation: DataTransformationSection,
  pub model_trainer: ModelTrainerSection,
  pub model_evaluation: ModelEvaluationSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataIngestionSection {
  pub root_dir: PathBuf,
  #[serde(rename = "source_URL", alias = "source_url")]
  pub source_url: String,
  pub local_data_file: PathBuf,
  pub unzip_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataTransformationSection {
  pub root_dir: PathBuf,
  pub data_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelTrainerSection {
  pub root_dir: PathBuf,
  pub data_path: PathBuf,
  pub tokenizer_path: PathBuf,
  #[serde(default = "default_model_name")]
  pub model_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelEvaluationSection {
  pub root_dir: PathBuf,
  pub data_path: PathBuf,
  pub model_path: PathBuf,
  pub tokenizer_path: PathBuf,
  pub metric_file_name: PathBuf,
}

fn default_model_name() -> String {
  "summarizer-model".to_string()
}

// --- params.yaml ---

#[derive(Debug, Clone, Deserialize)]
pub struct Params {
  #[serde(rename = "Tokenization", default)]
  pub tokenization: TokenizationParams,
  #[serde(rename = "TrainingArguments")]
  pub training_arguments: TrainingArguments,
  #[serde(rename = "Generation", default)]
  pub generation: GenerationParams,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenizationParams {
  pub vocab_size: usize,
  pub max_input_length: usize,
  pub max_target_length: usize,
}

impl Default for TokenizationParams {
  fn default() -> Self {
    Self {
      vocab_size: 30_000,
      max_input_length: 1024,
      max_target_length: 128,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStrategy {
  No,
  Steps,
  Epoch,
}

/// Hyperparameters of the training loop. Field names follow the usual
/// `TrainingArguments` vocabulary so existing params files keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingArguments {
  pub num_train_epochs: usize,
  pub warmup_steps: usize,
  pub per_device_train_batch_size: usize,
  pub weight_decay: f32,
  pub logging_steps: usize,
  pub evaluation_strategy: EvaluationStrategy,
  pub eval_steps: usize,
  pub save_steps: usize,
  pub gradient_accumulation_steps: usize,
  #[serde(default = "default_learning_rate")]
  pub learning_rate: f32,
  #[serde(default = "default_seed")]
  pub seed: u64,
}

fn default_learning_rate() -> f32 {
  0.5
}

fn default_seed() -> u64 {
  42
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
  /// How many rows of the test split are summarized and scored.
  pub num_samples: usize,
  pub batch_size: usize,
  /// Token budget of a generated summary.
  pub max_length: usize,
  /// Exponent applied to utterance length when ranking utterances.
  pub length_penalty: f32,
}

impl Default for GenerationParams {
  fn default() -> Self {
    Self {
      num_samples: 10,
      batch_size: 2,
      max_length: 128,
      length_penalty: 0.8,
    }
  }
}

// --- per-stage configuration handed to components ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataIngestionConfig {
  pub root_dir: PathBuf,
  pub source_url: String,
  pub local_data_file: PathBuf,
  pub unzip_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTransformationConfig {
  pub root_dir: PathBuf,
  pub data_path: PathBuf,
  pub vocab_size: usize,
  pub max_input_length: usize,
  pub max_target_length: usize,
}

#[derive(Debug, Clone)]
pub struct ModelTrainerConfig {
  pub root_dir: PathBuf,
  pub data_path: PathBuf,
  pub tokenizer_path: PathBuf,
  pub model_name: String,
  pub training: TrainingArguments,
}

#[derive(Debug, Clone)]
pub struct ModelEvaluationConfig {
  pub root_dir: PathBuf,
  pub data_path: PathBuf,
  pub model_path: PathBuf,
  pub tokenizer_path: PathBuf,
  pub metric_file_name: PathBuf,
  pub generation: GenerationParams,
}
