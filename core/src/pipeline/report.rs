// conveyor/src/pipeline/report.rs

//! What a run leaves behind: the outcome plus the final status of each stage.

use crate::core::control::PipelineResult;
use crate::core::stage::StageStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
  pub name: String,
  pub status: StageStatus,
}

/// Result of `Pipeline::run_with_report`.
#[derive(Debug)]
pub struct RunReport<Err> {
  /// One entry per declared stage, in run order.
  pub stages: Vec<StageReport>,
  pub outcome: Result<PipelineResult, Err>,
}

impl<Err> RunReport<Err> {
  pub(crate) fn new(stage_names: impl IntoIterator<Item = String>) -> Self {
    Self {
      stages: stage_names
        .into_iter()
        .map(|name| StageReport {
          name,
          status: StageStatus::NotStarted,
        })
        .collect(),
      outcome: Ok(PipelineResult::Completed),
    }
  }

  pub(crate) fn set_status(&mut self, idx: usize, status: StageStatus) {
    let entry = &mut self.stages[idx];
    debug_assert!(
      entry.status.can_transition_to(status),
      "illegal stage transition {:?} -> {:?} for '{}'",
      entry.status,
      status,
      entry.name
    );
    entry.status = status;
  }

  pub fn status_of(&self, stage_name: &str) -> Option<StageStatus> {
    self.stages.iter().find(|s| s.name == stage_name).map(|s| s.status)
  }

  /// Names of the stages that reached `status`, in run order.
  pub fn stages_with(&self, status: StageStatus) -> Vec<&str> {
    self
      .stages
      .iter()
      .filter(|s| s.status == status)
      .map(|s| s.name.as_str())
      .collect()
  }

  /// The stage that failed, if any.
  pub fn failed_stage(&self) -> Option<&str> {
    self.stages_with(StageStatus::Failed).into_iter().next()
  }

  pub fn is_success(&self) -> bool {
    self.outcome.is_ok()
  }

  pub fn into_outcome(self) -> Result<PipelineResult, Err> {
    self.outcome
  }
}
