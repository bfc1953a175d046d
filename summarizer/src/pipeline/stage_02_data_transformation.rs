// text-summarizer/src/pipeline/stage_02_data_transformation.rs

use crate::components::DataTransformation;
use crate::config::ConfigurationManager;
use crate::errors::Result;
use crate::pipeline::Stage;
use async_trait::async_trait;

pub const STAGE_NAME: &str = "Data Transformation Stage";

pub struct DataTransformationTrainingPipeline;

#[async_trait]
impl Stage for DataTransformationTrainingPipeline {
  fn name(&self) -> &'static str {
    STAGE_NAME
  }

  async fn run(&self, config: &ConfigurationManager) -> Result<()> {
    let data_transformation = DataTransformation::new(config.data_transformation_config());
    data_transformation.convert()
  }
}
