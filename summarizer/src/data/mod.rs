// text-summarizer/src/data/mod.rs

pub mod records;
pub mod tokenizer;

pub use records::{read_jsonl, read_split, write_jsonl, DialogueRecord, Split, TokenizedExample, DATASET_DIR};
