// conveyor/src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct, its construction and structural edits.

use crate::core::context::Handler;
use crate::core::stage::{SkipCondition, StageDef};
use crate::error::{ConveyorError, ConveyorResult};
use std::collections::HashMap;

/// An ordered list of named stages sharing a `ContextData<TData>`.
///
/// `Err` is what handlers return and what `run` reports. It must be
/// `From<ConveyorError>` so engine-level failures (a required stage without
/// handlers, for instance) travel through the same channel.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  pub(crate) stages: Vec<StageDef<TData>>,

  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(name, optional, skip_if)` triples, in run order.
  ///
  /// # Panics
  /// If two stages share a name.
  pub fn new(stage_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let mut pipeline = Self {
      stages: Vec::with_capacity(stage_defs.len()),
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    };
    for (name, optional, skip_if) in stage_defs {
      if pipeline.contains_stage(name) {
        panic!("Conveyor setup error: stage '{}' declared twice.", name);
      }
      pipeline.stages.push(StageDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      });
    }
    pipeline
  }

  /// Stage names in run order.
  pub fn stage_names(&self) -> Vec<&str> {
    self.stages.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn contains_stage(&self, stage_name: &str) -> bool {
    self.stages.iter().any(|s| s.name == stage_name)
  }

  fn position(&self, stage_name: &str) -> ConveyorResult<usize> {
    self
      .stages
      .iter()
      .position(|s| s.name == stage_name)
      .ok_or_else(|| ConveyorError::StageNotFound {
        stage_name: stage_name.to_string(),
      })
  }

  /// Panics on unknown names; used by handler registration where a typo is a
  /// programming error rather than a runtime condition.
  pub(crate) fn ensure_stage_exists(&self, stage_name: &str) {
    if !self.contains_stage(stage_name) {
      panic!(
        "Conveyor setup error: stage '{}' not found in pipeline definition.",
        stage_name
      );
    }
  }

  fn insert_at(
    &mut self,
    idx: usize,
    new_stage_name: String,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) -> ConveyorResult<()> {
    if self.contains_stage(&new_stage_name) {
      return Err(ConveyorError::ConfigurationError {
        stage_name: new_stage_name,
        message: "a stage with this name already exists".to_string(),
      });
    }
    self.stages.insert(
      idx,
      StageDef {
        name: new_stage_name,
        optional,
        skip_if,
      },
    );
    Ok(())
  }

  pub fn insert_before_stage<S: Into<String>>(
    &mut self,
    existing_stage_name: &str,
    new_stage_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) -> ConveyorResult<()> {
    let idx = self.position(existing_stage_name)?;
    self.insert_at(idx, new_stage_name.into(), optional, skip_if)
  }

  pub fn insert_after_stage<S: Into<String>>(
    &mut self,
    existing_stage_name: &str,
    new_stage_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) -> ConveyorResult<()> {
    let idx = self.position(existing_stage_name)?;
    self.insert_at(idx + 1, new_stage_name.into(), optional, skip_if)
  }

  /// Removes a stage together with all of its handlers.
  pub fn remove_stage(&mut self, stage_name: &str) -> ConveyorResult<()> {
    let idx = self.position(stage_name)?;
    self.stages.remove(idx);
    self.before.remove(stage_name);
    self.on.remove(stage_name);
    self.after.remove(stage_name);
    Ok(())
  }

  pub fn set_optional(&mut self, stage_name: &str, optional: bool) -> ConveyorResult<()> {
    let idx = self.position(stage_name)?;
    self.stages[idx].optional = optional;
    Ok(())
  }

  pub fn set_skip_condition(
    &mut self,
    stage_name: &str,
    skip_if: Option<SkipCondition<TData>>,
  ) -> ConveyorResult<()> {
    let idx = self.position(stage_name)?;
    self.stages[idx].skip_if = skip_if;
    Ok(())
  }
}
