// conveyor/src/pipeline/mod.rs

//! The `Pipeline<TData, Err>` type: definition and structural edits, handler
//! registration, execution and the per-run report.

pub mod definition;
pub mod execution;
pub mod hooks;
pub mod report;

pub use definition::Pipeline;
pub use report::{RunReport, StageReport};
