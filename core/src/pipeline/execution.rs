// conveyor/src/pipeline/execution.rs

//! `Pipeline::run` and `Pipeline::run_with_report`.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::stage::StageStatus;
use crate::error::ConveyorError;
use crate::pipeline::definition::Pipeline;
use crate::pipeline::report::RunReport;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  /// Runs every stage in declared order and returns the outcome.
  ///
  /// The first handler error ends the run and is returned as is; no later
  /// handler or stage is invoked.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    self.run_with_report(ctx_data).await.into_outcome()
  }

  /// Like `run`, but also reports the final `StageStatus` of each stage.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_stages = self.stages.len(),
    )
  )]
  pub async fn run_with_report(&self, ctx_data: ContextData<TData>) -> RunReport<Err> {
    let mut report = RunReport::new(self.stages.iter().map(|s| s.name.clone()));
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (stage_idx, stage_def) in self.stages.iter().enumerate() {
      let stage_name = stage_def.name.as_str();

      if let Some(skip_if) = &stage_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(Level::INFO, stage = stage_name, "Stage skipped by its skip condition.");
          report.set_status(stage_idx, StageStatus::Skipped);
          continue;
        }
      }

      if !self.has_handlers(stage_name) {
        if stage_def.optional {
          event!(Level::DEBUG, stage = stage_name, "Optional stage has no handlers, skipping.");
          report.set_status(stage_idx, StageStatus::Skipped);
          continue;
        }
        event!(Level::ERROR, stage = stage_name, "Non-optional stage has no handlers.");
        report.set_status(stage_idx, StageStatus::Running);
        report.set_status(stage_idx, StageStatus::Failed);
        report.outcome = Err(Err::from(ConveyorError::HandlerMissing {
          stage_name: stage_def.name.clone(),
        }));
        return report;
      }

      report.set_status(stage_idx, StageStatus::Running);
      event!(Level::INFO, stage = stage_name, ">>>>>> Stage {} started <<<<<<", stage_name);

      let stage_span = span!(Level::INFO, "stage", name = stage_name, index = stage_idx);
      let outcome = self.run_stage(stage_name, &ctx_data).instrument(stage_span).await;

      match outcome {
        Ok(control) => {
          report.set_status(stage_idx, StageStatus::Completed);
          event!(Level::INFO, stage = stage_name, ">>>>>> Stage {} completed <<<<<<", stage_name);
          if control == PipelineControl::Stop {
            event!(Level::INFO, stage = stage_name, "Pipeline stopped by a handler.");
            report.outcome = Ok(PipelineResult::Stopped);
            return report;
          }
        }
        Err(e) => {
          report.set_status(stage_idx, StageStatus::Failed);
          event!(Level::ERROR, stage = stage_name, error = ?e, "Error in stage {}: {}", stage_name, e);
          report.outcome = Err(e);
          return report;
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    report
  }

  /// Runs the before, on and after phases of one stage. Returns `Stop` as soon
  /// as any handler asks for it.
  async fn run_stage(&self, stage_name: &str, ctx_data: &ContextData<TData>) -> Result<PipelineControl, Err> {
    for (phase, map) in [("before", &self.before), ("on", &self.on), ("after", &self.after)] {
      if let Some(handlers) = map.get(stage_name) {
        if run_phase(phase, handlers, ctx_data).await? == PipelineControl::Stop {
          return Ok(PipelineControl::Stop);
        }
      }
    }
    Ok(PipelineControl::Continue)
  }
}

async fn run_phase<TData, Err>(
  phase: &'static str,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<PipelineControl, Err>
where
  TData: 'static + Send + Sync,
  Err: std::fmt::Display,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    let handler_span = span!(Level::DEBUG, "handler", phase, index = handler_idx);
    match handler_fn(ctx_data.clone()).instrument(handler_span).await {
      Ok(PipelineControl::Continue) => {}
      Ok(PipelineControl::Stop) => {
        event!(Level::DEBUG, phase, handler_idx, "Handler requested stop.");
        return Ok(PipelineControl::Stop);
      }
      Err(e) => {
        event!(Level::DEBUG, phase, handler_idx, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PipelineControl::Continue)
}
