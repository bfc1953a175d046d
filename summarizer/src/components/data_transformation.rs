// text-summarizer/src/components/data_transformation.rs

use crate::config::DataTransformationConfig;
use crate::data::tokenizer::{build_vocab, encode, load_tokenizer, save_tokenizer, truncate_with_eos};
use crate::data::{read_split, write_jsonl, DialogueRecord, Split, TokenizedExample, DATASET_DIR};
use crate::errors::{Result, SummarizerError};
use crate::utils::create_directories;
use tokenizers::Tokenizer;

pub const TOKENIZER_DIR: &str = "tokenizer";

/// Turns raw dialogue records into tokenized training examples.
pub struct DataTransformation {
  config: DataTransformationConfig,
}

impl DataTransformation {
  pub fn new(config: DataTransformationConfig) -> Self {
    Self { config }
  }

  /// Encodes one record: the dialogue becomes `input_ids` and the summary
  /// becomes `labels`, each truncated and terminated with `</s>`.
  pub fn convert_example(&self, tokenizer: &Tokenizer, record: &DialogueRecord) -> Result<TokenizedExample> {
    let input_ids = truncate_with_eos(encode(tokenizer, &record.dialogue)?, self.config.max_input_length);
    let labels = truncate_with_eos(encode(tokenizer, &record.summary)?, self.config.max_target_length);
    Ok(TokenizedExample {
      id: record.id.clone(),
      dialogue: record.dialogue.clone(),
      summary: record.summary.clone(),
      attention_mask: vec![1; input_ids.len()],
      input_ids,
      labels,
    })
  }

  /// Builds the tokenizer from the train split, then writes every split found
  /// under `data_path` in tokenized form. Splits are read from JSON Lines files
  /// or from a saved dataset's Arrow shards.
  pub fn convert(&self) -> Result<()> {
    let out_dir = self.config.root_dir.join(DATASET_DIR);
    create_directories(&[&self.config.root_dir, &out_dir])?;

    let Some(train) = read_split(&self.config.data_path, Split::Train)? else {
      return Err(SummarizerError::Dataset(format!(
        "training split not found in '{}' (expected train.jsonl or train/*.arrow)",
        self.config.data_path.display()
      )));
    };
    let vocab = build_vocab(
      train.iter().flat_map(|r| [r.dialogue.as_str(), r.summary.as_str()]),
      self.config.vocab_size,
    )?;
    let tokenizer_dir = self.config.root_dir.join(TOKENIZER_DIR);
    save_tokenizer(&tokenizer_dir, &vocab)?;
    let tokenizer = load_tokenizer(&tokenizer_dir)?;

    for split in Split::ALL {
      let loaded;
      let records = if split == Split::Train {
        &train
      } else {
        match read_split(&self.config.data_path, split)? {
          Some(rows) => {
            loaded = rows;
            &loaded
          }
          None => {
            tracing::warn!(%split, "Split not present in {}, skipping", self.config.data_path.display());
            continue;
          }
        }
      };
      let examples = records
        .iter()
        .map(|record| self.convert_example(&tokenizer, record))
        .collect::<Result<Vec<_>>>()?;
      let out_path = split.path_in(&out_dir);
      write_jsonl(&out_path, &examples)?;
      tracing::info!(%split, rows = examples.len(), "Tokenized split written to {}", out_path.display());
    }
    Ok(())
  }
}
