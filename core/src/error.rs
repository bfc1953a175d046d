// conveyor/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Errors raised by the engine itself, as opposed to errors produced by handlers.
///
/// Pipelines are generic over their handler error type `Err`, which must be
/// `From<ConveyorError>` so engine failures can be reported through the same channel.
#[derive(Debug, Error)]
pub enum ConveyorError {
  #[error("Stage not found: {stage_name}")]
  StageNotFound { stage_name: String },

  #[error("Handler missing for non-optional stage: {stage_name}")]
  HandlerMissing { stage_name: String },

  #[error("Configuration error for stage '{stage_name}': {message}")]
  ConfigurationError { stage_name: String, message: String },

  #[error("Error in handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal conveyor error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for ConveyorError {
  fn from(err: AnyhowError) -> Self {
    // An anyhow error that already carries a ConveyorError is unwrapped rather
    // than nested as HandlerError(HandlerError(..)).
    match err.downcast::<ConveyorError>() {
      Ok(inner) => inner,
      Err(source) => ConveyorError::HandlerError { source },
    }
  }
}

pub type ConveyorResult<T, E = ConveyorError> = std::result::Result<T, E>;
