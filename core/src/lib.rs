// conveyor/src/lib.rs

//! Conveyor: a small staged pipeline engine.
//!
//! A `Pipeline<TData, Err>` is an ordered list of named stages. Each stage runs
//! its `before`, `on` and `after` handlers against a shared `ContextData<TData>`.
//! Stages never overlap: stage K+1 starts only after every handler of stage K
//! returned `Ok(PipelineControl::Continue)`.
//!
//! Features:
//!  - Named stages, optionally skippable through a per-stage condition.
//!  - Optional stages that may be left without handlers.
//!  - Early, non-error termination with `PipelineControl::Stop`.
//!  - Fail-fast error propagation: the first handler error ends the run and is
//!    returned to the caller unchanged.
//!  - `started` / `completed` lifecycle log lines per stage and a `RunReport`
//!    with the final `StageStatus` of every stage.

pub mod core;
pub mod error;
pub mod pipeline;

// --- Re-exports for the Public API ---

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::stage::{SkipCondition, StageDef, StageStatus};

pub use crate::pipeline::definition::Pipeline;
pub use crate::pipeline::report::{RunReport, StageReport};

pub use crate::error::{ConveyorError, ConveyorResult};

/*
    Typical use:
    1. Define the data every stage shares, e.g. `RunCtx`.
    2. Create `Pipeline::<RunCtx, MyError>::new(&[("Stage A", false, None), ...])`
       where `MyError: From<ConveyorError>`.
    3. Attach handlers with `.on("Stage A", |ctx| async move { ... })`
       (and `.before` / `.after` where needed).
    4. `pipeline.run(ContextData::new(run_ctx)).await`, or `run_with_report`
       to also get the per-stage statuses.
*/
