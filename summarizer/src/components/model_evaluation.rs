// text-summarizer/src/components/model_evaluation.rs

use crate::config::ModelEvaluationConfig;
use crate::data::tokenizer::load_tokenizer;
use crate::data::{read_jsonl, write_jsonl, Split, TokenizedExample};
use crate::errors::Result;
use crate::metrics::RougeScores;
use crate::model::{SalienceModel, MODEL_FILE};
use crate::utils::{create_directories, write_file};
use serde::Serialize;
use std::path::Path;

pub const PREDICTIONS_FILE: &str = "predictions.jsonl";

#[derive(Debug, Serialize)]
struct Prediction<'a> {
  id: &'a str,
  reference: &'a str,
  prediction: &'a str,
}

/// Scores the trained model's summaries of the test split with ROUGE.
pub struct ModelEvaluation {
  config: ModelEvaluationConfig,
}

impl ModelEvaluation {
  pub fn new(config: ModelEvaluationConfig) -> Self {
    Self { config }
  }

  pub fn evaluate(&self) -> Result<()> {
    let params = &self.config.generation;
    create_directories(&[&self.config.root_dir])?;

    let tokenizer = load_tokenizer(&self.config.tokenizer_path)?;
    let model = SalienceModel::load(&self.config.model_path.join(MODEL_FILE))?;
    let test: Vec<TokenizedExample> =
      read_jsonl(&Split::Test.path_in(&self.config.data_path), Some(params.num_samples))?;

    let mut predictions = Vec::with_capacity(test.len());
    for (batch_idx, batch) in test.chunks(params.batch_size).enumerate() {
      for example in batch {
        predictions.push(model.summarize(&tokenizer, &example.dialogue, params.max_length, params.length_penalty)?);
      }
      tracing::debug!(batch = batch_idx, size = batch.len(), "Summarized batch");
    }

    let references: Vec<&str> = test.iter().map(|ex| ex.summary.as_str()).collect();
    let candidates: Vec<&str> = predictions.iter().map(String::as_str).collect();
    let scores = RougeScores::corpus(&candidates[..], &references[..]);
    tracing::info!(
      samples = test.len(),
      rouge1 = scores.rouge1,
      rouge2 = scores.rouge2,
      rouge_l = scores.rouge_l,
      rouge_lsum = scores.rouge_lsum,
      "Evaluation finished"
    );

    let rows: Vec<Prediction> = test
      .iter()
      .zip(&candidates)
      .map(|(ex, pred)| Prediction {
        id: &ex.id,
        reference: &ex.summary,
        prediction: pred,
      })
      .collect();
    write_jsonl(&self.config.root_dir.join(PREDICTIONS_FILE), &rows)?;

    write_metrics_csv(&self.config.metric_file_name, &model_label(&self.config.model_path), &scores)
  }
}

fn model_label(model_path: &Path) -> String {
  model_path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| "model".to_string())
}

/// One-row CSV report indexed by model name.
pub fn write_metrics_csv(path: &Path, model_name: &str, scores: &RougeScores) -> Result<()> {
  let contents = format!(
    ",rouge1,rouge2,rougeL,rougeLsum\n{},{:.6},{:.6},{:.6},{:.6}\n",
    model_name, scores.rouge1, scores.rouge2, scores.rouge_l, scores.rouge_lsum
  );
  write_file(path, contents)?;
  tracing::info!("Metrics written to {}", path.display());
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn csv_has_header_and_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eval/metrics.csv");
    let scores = RougeScores {
      rouge1: 0.5,
      rouge2: 0.25,
      rouge_l: 0.4,
      rouge_lsum: 0.45,
    };
    write_metrics_csv(&path, "summarizer-model", &scores).unwrap();
    assert_eq!(
      std::fs::read_to_string(path).unwrap(),
      ",rouge1,rouge2,rougeL,rougeLsum\nsummarizer-model,0.500000,0.250000,0.400000,0.450000\n"
    );
  }

  #[test]
  fn label_is_the_model_directory_name() {
    assert_eq!(model_label(Path::new("artifacts/model_trainer/summarizer-model")), "summarizer-model");
  }
}
