// text-summarizer/src/pipeline/stage_03_model_trainer.rs

use crate::components::ModelTrainer;
use crate::config::ConfigurationManager;
use crate::errors::Result;
use crate::pipeline::Stage;
use async_trait::async_trait;

pub const STAGE_NAME: &str = "Model Trainer Stage";

/// Trains the summarizer on the tokenized splits.
pub struct ModelTrainerTrainingPipeline;

#[async_trait]
impl Stage for ModelTrainerTrainingPipeline {
  fn name(&self) -> &'static str {
    STAGE_NAME
  }

  async fn run(&self, config: &ConfigurationManager) -> Result<()> {
    let model_trainer = ModelTrainer::new(config.model_trainer_config());
    model_trainer.train()
  }
}
