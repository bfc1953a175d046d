// text-summarizer/src/data/tokenizer.rs

//! Word-level tokenizer built from the training corpus.
//!
//! The vocabulary is computed here and written as a `tokenizer.json` in the
//! HuggingFace format, then loaded back through `tokenizers::Tokenizer`. Words
//! are counted after the same `BertNormalizer` and `Whitespace` pre-tokenizer
//! the saved tokenizer runs, so every vocabulary entry is reachable at encode
//! time.

use crate::errors::{Result, SummarizerError};
use crate::utils::{create_directories, write_file};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokenizers::normalizers::BertNormalizer;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{
  NormalizedString, Normalizer, OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer,
};

pub const TOKENIZER_FILE: &str = "tokenizer.json";

pub const PAD_TOKEN: &str = "<pad>";
pub const EOS_TOKEN: &str = "</s>";
pub const UNK_TOKEN: &str = "<unk>";

pub const PAD_ID: u32 = 0;
pub const EOS_ID: u32 = 1;
pub const UNK_ID: u32 = 2;

const SPECIAL_TOKENS: [&str; 3] = [PAD_TOKEN, EOS_TOKEN, UNK_TOKEN];

fn normalizer() -> BertNormalizer {
  BertNormalizer::new(true, false, Some(false), true)
}

/// Words and punctuation runs of `text`, in order, as the saved tokenizer sees
/// them: control and format characters removed, lowercased.
pub fn words(text: &str) -> Result<Vec<String>> {
  let mut normalized = NormalizedString::from(text);
  normalizer().normalize(&mut normalized)?;
  let mut pre_tokenized = PreTokenizedString::from(normalized);
  Whitespace::default().pre_tokenize(&mut pre_tokenized)?;
  Ok(
    pre_tokenized
      .get_splits(OffsetReferential::Normalized, OffsetType::Byte)
      .into_iter()
      .map(|(word, _, _)| word.to_string())
      .collect(),
  )
}

/// Vocabulary in id order: the special tokens, then corpus words by
/// descending frequency (ties broken lexically), capped at `vocab_size`.
pub fn build_vocab<'a>(texts: impl IntoIterator<Item = &'a str>, vocab_size: usize) -> Result<Vec<String>> {
  let mut freq: HashMap<String, usize> = HashMap::new();
  for text in texts {
    for word in words(text)? {
      *freq.entry(word).or_insert(0) += 1;
    }
  }
  for special in SPECIAL_TOKENS {
    freq.remove(special);
  }

  let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
  ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

  let mut vocab: Vec<String> = SPECIAL_TOKENS.iter().map(|s| s.to_string()).collect();
  let room = vocab_size.saturating_sub(vocab.len());
  vocab.extend(ranked.into_iter().take(room).map(|(word, _)| word));
  Ok(vocab)
}

fn tokenizer_json(vocab: &[String]) -> Value {
  let vocab_map: Map<String, Value> = vocab
    .iter()
    .enumerate()
    .map(|(id, word)| (word.clone(), json!(id)))
    .collect();

  let added_tokens: Vec<Value> = SPECIAL_TOKENS
    .iter()
    .enumerate()
    .map(|(id, content)| {
      json!({
        "id": id,
        "content": content,
        "single_word": false,
        "lstrip": false,
        "rstrip": false,
        "normalized": false,
        "special": true
      })
    })
    .collect();

  json!({
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": added_tokens,
    "normalizer": {
      "type": "BertNormalizer",
      "clean_text": true,
      "handle_chinese_chars": false,
      "strip_accents": false,
      "lowercase": true
    },
    "pre_tokenizer": { "type": "Whitespace" },
    "post_processor": null,
    "decoder": null,
    "model": {
      "type": "WordLevel",
      "vocab": vocab_map,
      "unk_token": UNK_TOKEN
    }
  })
}

/// Writes `dir/tokenizer.json` for `vocab` and returns its path.
pub fn save_tokenizer(dir: &Path, vocab: &[String]) -> Result<PathBuf> {
  create_directories(&[dir])?;
  let path = dir.join(TOKENIZER_FILE);
  let text = serde_json::to_string_pretty(&tokenizer_json(vocab)).map_err(SummarizerError::json(&path))?;
  write_file(&path, text)?;
  tracing::info!("Tokenizer with {} entries saved to '{}'", vocab.len(), path.display());
  Ok(path)
}

pub fn load_tokenizer(dir: &Path) -> Result<Tokenizer> {
  let path = dir.join(TOKENIZER_FILE);
  if !path.is_file() {
    return Err(SummarizerError::Tokenizer(format!(
      "no tokenizer found at '{}'",
      path.display()
    )));
  }
  Tokenizer::from_file(&path)
    .map_err(|e| SummarizerError::Tokenizer(format!("cannot load tokenizer from '{}': {}", path.display(), e)))
}

/// Copies `from_dir/tokenizer.json` into `to_dir`.
pub fn copy_tokenizer(from_dir: &Path, to_dir: &Path) -> Result<()> {
  create_directories(&[to_dir])?;
  let from = from_dir.join(TOKENIZER_FILE);
  let to = to_dir.join(TOKENIZER_FILE);
  fs::copy(&from, &to).map_err(SummarizerError::io(&from))?;
  Ok(())
}

/// Token ids of `text`, without special tokens.
pub fn encode(tokenizer: &Tokenizer, text: &str) -> Result<Vec<u32>> {
  let encoding = tokenizer.encode(text, false)?;
  Ok(encoding.get_ids().to_vec())
}

/// `ids` cut to `max_len - 1` tokens with `</s>` appended.
pub fn truncate_with_eos(mut ids: Vec<u32>, max_len: usize) -> Vec<u32> {
  ids.truncate(max_len.saturating_sub(1));
  ids.push(EOS_ID);
  ids
}
