// conveyor/src/core/context.rs

//! The boxed handler type stored by a pipeline for every stage phase.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A stage handler as stored by `Pipeline<TData, Err>`.
///
/// Handlers receive their own clone of the run's `ContextData<TData>` and resolve
/// to either a `PipelineControl` or the pipeline's error type. Lock guards taken on
/// the context must be released before the handler awaits anything.
///
/// User code normally does not build these by hand: `Pipeline::on` and friends
/// accept any `Fn(ContextData<TData>) -> impl Future` and box it.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
