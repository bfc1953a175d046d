// text-summarizer/src/lib.rs

//! Four-stage training pipeline for a dialogue summarizer: data ingestion,
//! data transformation, model training and model evaluation, run in order on
//! top of the `conveyor` stage engine.

pub mod components;
pub mod config;
pub mod data;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod utils;

pub use config::ConfigurationManager;
pub use errors::{Result, SummarizerError};
pub use pipeline::{build_pipeline, default_stages, run_stages, run_training_pipeline, RunContext, Stage};
