// text-summarizer/src/pipeline/stage_01_data_ingestion.rs

use crate::components::DataIngestion;
use crate::config::ConfigurationManager;
use crate::errors::Result;
use crate::pipeline::Stage;
use async_trait::async_trait;

pub const STAGE_NAME: &str = "Data Ingestion Stage";

/// Downloads the raw dataset archive and unpacks it.
pub struct DataIngestionTrainingPipeline;

#[async_trait]
impl Stage for DataIngestionTrainingPipeline {
  fn name(&self) -> &'static str {
    STAGE_NAME
  }

  async fn run(&self, config: &ConfigurationManager) -> Result<()> {
    let data_ingestion = DataIngestion::new(config.data_ingestion_config());
    data_ingestion.ingest().await
  }
}
