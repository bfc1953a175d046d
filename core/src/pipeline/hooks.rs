// conveyor/src/pipeline/hooks.rs

//! Handler registration for the three phases of a stage.
//!
//! Within a stage all `before` handlers run first, then `on`, then `after`,
//! each list in registration order.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::error::ConveyorError;
use crate::pipeline::definition::Pipeline;
use std::collections::HashMap;
use std::future::Future;
use tracing::{event, Level};

/// Boxes a user closure into the stored `Handler` form, converting the user's
/// error type into the pipeline's.
fn boxed_handler<TData, Err, F, UserErr>(
  handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: 'static,
  F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
  UserErr: Into<Err> + Send + Sync + 'static,
{
  Box::new(move |ctx_data| {
    let user_fut = handler_fn(ctx_data);
    Box::pin(async move { user_fut.await.map_err(Into::into) })
  })
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  fn push_handler(
    phase: &'static str,
    map: &mut HashMap<String, Vec<Handler<TData, Err>>>,
    stage_name: &str,
    handler: Handler<TData, Err>,
  ) {
    let handlers = map.entry(stage_name.to_string()).or_default();
    handlers.push(handler);
    event!(Level::TRACE, %stage_name, phase, count = handlers.len(), "Handler registered.");
  }

  /// Registers a handler that runs before the stage's `on` handlers.
  ///
  /// # Panics
  /// If `stage_name` is not part of the pipeline.
  pub fn before<F, UserErr>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name);
    Self::push_handler("before", &mut self.before, stage_name, boxed_handler(handler_fn));
  }

  /// Registers the stage's main handler. Most stages have exactly one.
  ///
  /// # Panics
  /// If `stage_name` is not part of the pipeline.
  pub fn on<F, UserErr>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name);
    Self::push_handler("on", &mut self.on, stage_name, boxed_handler(handler_fn));
  }

  /// Registers a handler that runs after the stage's `on` handlers succeeded.
  ///
  /// # Panics
  /// If `stage_name` is not part of the pipeline.
  pub fn after<F, UserErr>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name);
    Self::push_handler("after", &mut self.after, stage_name, boxed_handler(handler_fn));
  }

  /// Whether any phase of the stage has at least one handler.
  pub(crate) fn has_handlers(&self, stage_name: &str) -> bool {
    [&self.before, &self.on, &self.after]
      .iter()
      .any(|map| map.get(stage_name).is_some_and(|v| !v.is_empty()))
  }
}
