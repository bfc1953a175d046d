// text-summarizer/src/pipeline/mod.rs

//! The stage wrappers and the driver that runs them through a `conveyor`
//! pipeline in fixed order.

pub mod stage_01_data_ingestion;
pub mod stage_02_data_transformation;
pub mod stage_03_model_trainer;
pub mod stage_04_model_evaluation;

use crate::config::ConfigurationManager;
use crate::errors::{Result, SummarizerError};
use async_trait::async_trait;
use conveyor::{ContextData, Pipeline, PipelineControl, PipelineResult, SkipCondition};
use std::sync::Arc;

pub use stage_01_data_ingestion::DataIngestionTrainingPipeline;
pub use stage_02_data_transformation::DataTransformationTrainingPipeline;
pub use stage_03_model_trainer::ModelTrainerTrainingPipeline;
pub use stage_04_model_evaluation::ModelEvaluationTrainingPipeline;

/// A pipeline stage: fetches its config from the manager, builds its
/// component and calls the component's entry method.
#[async_trait]
pub trait Stage: Send + Sync {
  fn name(&self) -> &'static str;

  async fn run(&self, config: &ConfigurationManager) -> Result<()>;
}

/// State shared by every stage of a run.
#[derive(Debug, Clone)]
pub struct RunContext {
  pub config: Arc<ConfigurationManager>,
}

pub type TrainingPipeline = Pipeline<RunContext, SummarizerError>;

/// The four stages in run order.
pub fn default_stages() -> Vec<Arc<dyn Stage>> {
  vec![
    Arc::new(DataIngestionTrainingPipeline),
    Arc::new(DataTransformationTrainingPipeline),
    Arc::new(ModelTrainerTrainingPipeline),
    Arc::new(ModelEvaluationTrainingPipeline),
  ]
}

/// One required engine stage per wrapper, named after it, whose only `on`
/// handler calls the wrapper.
///
/// # Panics
/// If two stages share a name.
pub fn build_pipeline(stages: Vec<Arc<dyn Stage>>) -> TrainingPipeline {
  let defs: Vec<(&str, bool, Option<SkipCondition<RunContext>>)> =
    stages.iter().map(|stage| (stage.name(), false, None)).collect();
  let mut pipeline = TrainingPipeline::new(&defs);

  for stage in stages {
    let name = stage.name();
    pipeline.on(name, move |ctx: ContextData<RunContext>| {
      let stage = stage.clone();
      async move {
        let config = ctx.read().config.clone();
        stage.run(&config).await?;
        Ok::<_, SummarizerError>(PipelineControl::Continue)
      }
    });
  }
  pipeline
}

/// Runs `stages` in order. The first stage error ends the run and is
/// returned unchanged.
pub async fn run_stages(config: Arc<ConfigurationManager>, stages: Vec<Arc<dyn Stage>>) -> Result<PipelineResult> {
  let pipeline = build_pipeline(stages);
  pipeline.run(ContextData::new(RunContext { config })).await
}

/// Runs all four stages.
pub async fn run_training_pipeline(config: Arc<ConfigurationManager>) -> Result<PipelineResult> {
  run_stages(config, default_stages()).await
}
