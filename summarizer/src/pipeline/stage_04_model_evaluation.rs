// text-summarizer/src/pipeline/stage_04_model_evaluation.rs

use crate::components::ModelEvaluation;
use crate::config::ConfigurationManager;
use crate::errors::Result;
use crate::pipeline::Stage;
use async_trait::async_trait;

pub const STAGE_NAME: &str = "Model Evaluation Stage";

pub struct ModelEvaluationTrainingPipeline;

#[async_trait]
impl Stage for ModelEvaluationTrainingPipeline {
  fn name(&self) -> &'static str {
    STAGE_NAME
  }

  async fn run(&self, config: &ConfigurationManager) -> Result<()> {
    let model_evaluation = ModelEvaluation::new(config.model_evaluation_config());
    model_evaluation.evaluate()
  }
}
