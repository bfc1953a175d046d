// conveyor/src/core/control.rs

//! Flow signals returned by handlers and the overall outcome of a run.

/// Returned by a handler to let the run proceed or to end it early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Run the remaining handlers of this stage, then the following stages.
  Continue,
  /// End the run now without an error. The current stage counts as completed;
  /// no further handler or stage is executed.
  Stop,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every stage either completed or was skipped.
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
