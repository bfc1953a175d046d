// conveyor/src/core/stage.rs

//! Stage definitions and the per-stage lifecycle state.

use super::ContextData;
use std::fmt;

/// Evaluated right before a stage runs; `true` skips the stage.
pub type SkipCondition<TData> = std::sync::Arc<dyn Fn(ContextData<TData>) -> bool + Send + Sync + 'static>;

/// One named stage of a pipeline.
#[derive(Clone)]
pub struct StageDef<T: 'static + Send + Sync> {
  pub name: String,
  /// An optional stage without handlers is skipped instead of failing the run.
  pub optional: bool,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> fmt::Debug for StageDef<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StageDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}

/// Lifecycle of a stage within one run.
///
/// `NotStarted -> Running -> Completed | Failed`, or `NotStarted -> Skipped`.
/// `Completed`, `Failed` and `Skipped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageStatus {
  NotStarted,
  Running,
  Completed,
  Failed,
  Skipped,
}

impl StageStatus {
  pub fn is_terminal(self) -> bool {
    matches!(self, StageStatus::Completed | StageStatus::Failed | StageStatus::Skipped)
  }

  /// Whether the lifecycle allows moving from `self` to `next`.
  pub fn can_transition_to(self, next: StageStatus) -> bool {
    matches!(
      (self, next),
      (StageStatus::NotStarted, StageStatus::Running)
        | (StageStatus::NotStarted, StageStatus::Skipped)
        | (StageStatus::Running, StageStatus::Completed)
        | (StageStatus::Running, StageStatus::Failed)
    )
  }
}

impl fmt::Display for StageStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      StageStatus::NotStarted => "not started",
      StageStatus::Running => "running",
      StageStatus::Completed => "completed",
      StageStatus::Failed => "failed",
      StageStatus::Skipped => "skipped",
    };
    f.write_str(label)
  }
}
