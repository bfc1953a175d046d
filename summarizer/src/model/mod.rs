// text-summarizer/src/model/mod.rs

pub mod salience;
pub mod schedule;

pub use salience::{fit, LogEntry, SalienceModel, TrainerState, MODEL_FILE, TRAINER_STATE_FILE};
pub use schedule::LinearSchedule;
