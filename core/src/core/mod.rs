pub mod context;
pub mod context_data;
pub mod control;
pub mod stage;

// Re-exported for the pipeline modules.
pub use context::Handler;
pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use stage::{SkipCondition, StageDef, StageStatus};
