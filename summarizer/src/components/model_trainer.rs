// text-summarizer/src/components/model_trainer.rs

use crate::components::data_transformation::TOKENIZER_DIR;
use crate::config::ModelTrainerConfig;
use crate::data::tokenizer::{copy_tokenizer, load_tokenizer};
use crate::data::{read_jsonl, Split, TokenizedExample};
use crate::errors::{Result, SummarizerError};
use crate::model::{fit, SalienceModel, MODEL_FILE, TRAINER_STATE_FILE};
use crate::utils::create_directories;

/// Fits the salience model on the tokenized train split.
pub struct ModelTrainer {
  config: ModelTrainerConfig,
}

impl ModelTrainer {
  pub fn new(config: ModelTrainerConfig) -> Self {
    Self { config }
  }

  pub fn train(&self) -> Result<()> {
    let root = &self.config.root_dir;
    create_directories(&[root])?;

    let tokenizer = load_tokenizer(&self.config.tokenizer_path)?;
    let vocab_size = tokenizer.get_vocab_size(true);

    let train_path = Split::Train.path_in(&self.config.data_path);
    if !train_path.is_file() {
      return Err(SummarizerError::Dataset(format!(
        "tokenized training split not found at '{}'",
        train_path.display()
      )));
    }
    let train: Vec<TokenizedExample> = read_jsonl(&train_path, None)?;
    let validation_path = Split::Validation.path_in(&self.config.data_path);
    let validation: Vec<TokenizedExample> = if validation_path.is_file() {
      read_jsonl(&validation_path, None)?
    } else {
      Vec::new()
    };
    tracing::info!(
      train = train.len(),
      validation = validation.len(),
      vocab_size,
      "Loaded tokenized splits"
    );

    let mut model = SalienceModel::new(vocab_size);
    let state = fit(&mut model, &train, &validation, &self.config.training, |step, snapshot| {
      let path = root.join(format!("checkpoint-{step}")).join(MODEL_FILE);
      snapshot.save(&path)?;
      tracing::info!("Saved checkpoint to {}", path.display());
      Ok(())
    })?;

    let model_dir = root.join(&self.config.model_name);
    model.save(&model_dir.join(MODEL_FILE))?;
    state.save(&model_dir.join(TRAINER_STATE_FILE))?;
    copy_tokenizer(&self.config.tokenizer_path, &root.join(TOKENIZER_DIR))?;
    tracing::info!("Model saved to {}", model_dir.display());
    Ok(())
  }
}
