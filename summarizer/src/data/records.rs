// text-summarizer/src/data/records.rs

//! Dataset rows and the JSON Lines files that hold them.

use crate::errors::{Result, SummarizerError};
use arrow::array::{Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::ipc::reader::StreamReader;
use arrow::record_batch::RecordBatch;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the dataset directory inside the raw archive and under the
/// transformation root.
pub const DATASET_DIR: &str = "samsum_dataset";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
  Train,
  Validation,
  Test,
}

impl Split {
  pub const ALL: [Split; 3] = [Split::Train, Split::Validation, Split::Test];

  pub fn as_str(&self) -> &'static str {
    match self {
      Split::Train => "train",
      Split::Validation => "validation",
      Split::Test => "test",
    }
  }

  pub fn file_name(&self) -> String {
    format!("{}.jsonl", self.as_str())
  }

  pub fn path_in(&self, dir: &Path) -> PathBuf {
    dir.join(self.file_name())
  }
}

impl fmt::Display for Split {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One raw row: a multi-line dialogue and its reference summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueRecord {
  pub id: String,
  pub dialogue: String,
  pub summary: String,
}

/// A row after tokenization. Text fields are kept so evaluation can score
/// against the untouched reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedExample {
  pub id: String,
  pub dialogue: String,
  pub summary: String,
  pub input_ids: Vec<u32>,
  pub attention_mask: Vec<u8>,
  pub labels: Vec<u32>,
}

/// Reads at most `limit` rows of a JSON Lines file. Blank lines are ignored.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path, limit: Option<usize>) -> Result<Vec<T>> {
  let file = File::open(path).map_err(SummarizerError::io(path))?;
  let mut rows = Vec::new();
  for (line_no, line) in BufReader::new(file).lines().enumerate() {
    if limit.is_some_and(|max| rows.len() >= max) {
      break;
    }
    let line = line.map_err(SummarizerError::io(path))?;
    if line.trim().is_empty() {
      continue;
    }
    let row = serde_json::from_str(&line).map_err(|e| {
      SummarizerError::Dataset(format!("{}:{}: {}", path.display(), line_no + 1, e))
    })?;
    rows.push(row);
  }
  Ok(rows)
}

/// Writes one JSON object per line, replacing any existing file.
pub fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
  let file = File::create(path).map_err(SummarizerError::io(path))?;
  let mut writer = BufWriter::new(file);
  for row in rows {
    serde_json::to_writer(&mut writer, row).map_err(SummarizerError::json(path))?;
    writer.write_all(b"\n").map_err(SummarizerError::io(path))?;
  }
  writer.flush().map_err(SummarizerError::io(path))
}

/// Loads the raw rows of `split` from `dir`. `<split>.jsonl` is read when
/// present, otherwise the Arrow stream shards of a saved dataset
/// (`<split>/*.arrow`) in file name order. `None` when neither exists.
pub fn read_split(dir: &Path, split: Split) -> Result<Option<Vec<DialogueRecord>>> {
  let jsonl = split.path_in(dir);
  if jsonl.is_file() {
    return read_jsonl(&jsonl, None).map(Some);
  }
  let shards = arrow_shards(&dir.join(split.as_str()))?;
  if shards.is_empty() {
    return Ok(None);
  }
  let mut rows = Vec::new();
  for shard in &shards {
    read_arrow_shard(shard, &mut rows)?;
  }
  Ok(Some(rows))
}

fn arrow_shards(split_dir: &Path) -> Result<Vec<PathBuf>> {
  if !split_dir.is_dir() {
    return Ok(Vec::new());
  }
  let mut shards = Vec::new();
  for entry in fs::read_dir(split_dir).map_err(SummarizerError::io(split_dir))? {
    let path = entry.map_err(SummarizerError::io(split_dir))?.path();
    if path.is_file() && path.extension().is_some_and(|ext| ext == "arrow") {
      shards.push(path);
    }
  }
  shards.sort();
  Ok(shards)
}

fn read_arrow_shard(path: &Path, rows: &mut Vec<DialogueRecord>) -> Result<()> {
  let file = File::open(path).map_err(SummarizerError::io(path))?;
  let reader = StreamReader::try_new(BufReader::new(file), None).map_err(SummarizerError::arrow(path))?;
  for batch in reader {
    let batch = batch.map_err(SummarizerError::arrow(path))?;
    let ids = string_column(&batch, "id", path)?;
    let dialogues = string_column(&batch, "dialogue", path)?;
    let summaries = string_column(&batch, "summary", path)?;
    for row in 0..batch.num_rows() {
      rows.push(DialogueRecord {
        id: string_at(&ids, row),
        dialogue: string_at(&dialogues, row),
        summary: string_at(&summaries, row),
      });
    }
  }
  Ok(())
}

fn string_column(batch: &RecordBatch, name: &str, path: &Path) -> Result<StringArray> {
  let column = batch.column_by_name(name).ok_or_else(|| {
    SummarizerError::Dataset(format!("column '{name}' missing in '{}'", path.display()))
  })?;
  let utf8 = cast(column.as_ref(), &DataType::Utf8).map_err(SummarizerError::arrow(path))?;
  utf8
    .as_any()
    .downcast_ref::<StringArray>()
    .cloned()
    .ok_or_else(|| SummarizerError::Dataset(format!("column '{name}' in '{}' is not text", path.display())))
}

fn string_at(column: &StringArray, row: usize) -> String {
  if column.is_null(row) {
    String::new()
  } else {
    column.value(row).to_string()
  }
}
