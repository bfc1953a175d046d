// text-summarizer/src/config/mod.rs

//! `ConfigurationManager`: reads `config/config.yaml` and `params.yaml` once and
//! hands each stage its own immutable config.

pub mod entity;

use crate::errors::{Result, SummarizerError};
use crate::utils::{create_directories, read_yaml};
use std::env;
use std::path::{Path, PathBuf};

pub use entity::{
  DataIngestionConfig, DataTransformationConfig, EvaluationStrategy, GenerationParams, ModelEvaluationConfig,
  ModelTrainerConfig, Params, PipelineConfig, TokenizationParams, TrainingArguments,
};

pub const CONFIG_FILE_PATH: &str = "config/config.yaml";
pub const PARAMS_FILE_PATH: &str = "params.yaml";

pub const CONFIG_PATH_ENV: &str = "SUMMARIZER_CONFIG";
pub const PARAMS_PATH_ENV: &str = "SUMMARIZER_PARAMS";

#[derive(Debug, Clone)]
pub struct ConfigurationManager {
  config: PipelineConfig,
  params: Params,
}

impl ConfigurationManager {
  pub fn new(config_path: impl AsRef<Path>, params_path: impl AsRef<Path>) -> Result<Self> {
    let config: PipelineConfig = read_yaml(config_path.as_ref())?;
    let params: Params = read_yaml(params_path.as_ref())?;
    Self::from_parts(config, params)
  }

  /// Loads from the default locations, honoring `SUMMARIZER_CONFIG` and
  /// `SUMMARIZER_PARAMS`, then creates `artifacts_root`. The binary loads
  /// `.env` before calling this.
  pub fn from_env() -> Result<Self> {
    let path_from_env = |var_name: &str, default: &str| -> PathBuf {
      env::var(var_name).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
    };
    let config_path = path_from_env(CONFIG_PATH_ENV, CONFIG_FILE_PATH);
    let params_path = path_from_env(PARAMS_PATH_ENV, PARAMS_FILE_PATH);

    let manager = Self::new(&config_path, &params_path)?;
    create_directories(&[manager.artifacts_root()])?;
    tracing::info!(
      config = %config_path.display(),
      params = %params_path.display(),
      "Configuration loaded successfully."
    );
    Ok(manager)
  }

  /// Builds a manager from already parsed files. Rejects hyperparameters the
  /// components cannot work with.
  pub fn from_parts(config: PipelineConfig, params: Params) -> Result<Self> {
    let args = &params.training_arguments;
    let positive = [
      ("TrainingArguments.per_device_train_batch_size", args.per_device_train_batch_size),
      ("TrainingArguments.gradient_accumulation_steps", args.gradient_accumulation_steps),
      ("TrainingArguments.logging_steps", args.logging_steps),
      ("TrainingArguments.save_steps", args.save_steps),
      ("Tokenization.max_input_length", params.tokenization.max_input_length),
      ("Tokenization.max_target_length", params.tokenization.max_target_length),
      ("Generation.batch_size", params.generation.batch_size),
      ("Generation.max_length", params.generation.max_length),
    ];
    for (name, value) in positive {
      if value == 0 {
        return Err(SummarizerError::Config(format!("'{}' must be greater than zero", name)));
      }
    }
    if args.evaluation_strategy == EvaluationStrategy::Steps && args.eval_steps == 0 {
      return Err(SummarizerError::Config(
        "'TrainingArguments.eval_steps' must be greater than zero when evaluation_strategy is 'steps'".to_string(),
      ));
    }
    // Room for the three special tokens plus at least one word.
    if params.tokenization.vocab_size < 4 {
      return Err(SummarizerError::Config(
        "'Tokenization.vocab_size' must be at least 4".to_string(),
      ));
    }
    Ok(Self { config, params })
  }

  pub fn artifacts_root(&self) -> &Path {
    &self.config.artifacts_root
  }

  pub fn data_ingestion_config(&self) -> DataIngestionConfig {
    let section = &self.config.data_ingestion;
    DataIngestionConfig {
      root_dir: section.root_dir.clone(),
      source_url: section.source_url.clone(),
      local_data_file: section.local_data_file.clone(),
      unzip_dir: section.unzip_dir.clone(),
    }
  }

  pub fn data_transformation_config(&self) -> DataTransformationConfig {
    let section = &self.config.data_transformation;
    let tokenization = &self.params.tokenization;
    DataTransformationConfig {
      root_dir: section.root_dir.clone(),
      data_path: section.data_path.clone(),
      vocab_size: tokenization.vocab_size,
      max_input_length: tokenization.max_input_length,
      max_target_length: tokenization.max_target_length,
    }
  }

  pub fn model_trainer_config(&self) -> ModelTrainerConfig {
    let section = &self.config.model_trainer;
    ModelTrainerConfig {
      root_dir: section.root_dir.clone(),
      data_path: section.data_path.clone(),
      tokenizer_path: section.tokenizer_path.clone(),
      model_name: section.model_name.clone(),
      training: self.params.training_arguments.clone(),
    }
  }

  pub fn model_evaluation_config(&self) -> ModelEvaluationConfig {
    let section = &self.config.model_evaluation;
    ModelEvaluationConfig {
      root_dir: section.root_dir.clone(),
      data_path: section.data_path.clone(),
      model_path: section.model_path.clone(),
      tokenizer_path: section.tokenizer_path.clone(),
      metric_file_name: section.metric_file_name.clone(),
      generation: self.params.generation.clone(),
    }
  }
}
