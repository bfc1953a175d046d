// text-summarizer/src/metrics/mod.rs

pub mod rouge;

pub use rouge::RougeScores;
