// text-summarizer/src/main.rs

use std::process::ExitCode;
use std::sync::Arc;
use text_summarizer::{logging, run_training_pipeline, ConfigurationManager};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  // Before logging, so RUST_LOG and the log directory can come from .env.
  dotenvy::dotenv().ok();

  if let Err(e) = logging::init() {
    eprintln!("Failed to initialize logging: {e}");
    return ExitCode::FAILURE;
  }

  let config = match ConfigurationManager::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load configuration.");
      return ExitCode::FAILURE;
    }
  };

  match run_training_pipeline(config).await {
    Ok(result) => {
      tracing::info!(?result, "Training pipeline finished.");
      ExitCode::SUCCESS
    }
    Err(e) => {
      tracing::error!(error = %e, "Training pipeline failed.");
      ExitCode::FAILURE
    }
  }
}
