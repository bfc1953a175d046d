// text-summarizer/src/components/mod.rs

//! One behavioral component per stage. Each exposes a single entry method
//! returning `Result<()>`.

pub mod data_ingestion;
pub mod data_transformation;
pub mod model_evaluation;
pub mod model_trainer;

pub use data_ingestion::DataIngestion;
pub use data_transformation::DataTransformation;
pub use model_evaluation::ModelEvaluation;
pub use model_trainer::ModelTrainer;
