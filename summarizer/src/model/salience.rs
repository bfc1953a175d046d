// text-summarizer/src/model/salience.rs

//! Extractive summarizer: a logistic model scoring how likely each dialogue
//! token is to appear in the reference summary, and the training loop that
//! fits it.
//!
//! Per token the logit is `token_weights[id] + position_weight * rel_pos + bias`
//! where `rel_pos` is the token's offset divided by the dialogue length.
//! Generation scores each utterance (dialogue line) by its summed token
//! salience divided by `len^length_penalty` and keeps the best ones within the
//! token budget.

use crate::config::{EvaluationStrategy, TrainingArguments};
use crate::data::tokenizer::{encode, EOS_ID, PAD_ID, UNK_ID};
use crate::data::TokenizedExample;
use crate::errors::{Result, SummarizerError};
use crate::model::schedule::LinearSchedule;
use crate::utils::write_file;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tokenizers::Tokenizer;

pub const MODEL_FILE: &str = "model.json";
pub const TRAINER_STATE_FILE: &str = "trainer_state.json";

fn sigmoid(z: f32) -> f32 {
  1.0 / (1.0 + (-z).exp())
}

/// Binary cross-entropy written as `softplus(z) - y * z`, stable for large |z|.
fn logistic_loss(z: f32, target: f32) -> f32 {
  let softplus = if z > 0.0 { z + (-z).exp().ln_1p() } else { z.exp().ln_1p() };
  softplus - target * z
}

fn is_special(id: u32) -> bool {
  id == PAD_ID || id == EOS_ID
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalienceModel {
  pub vocab_size: usize,
  pub token_weights: Vec<f32>,
  pub position_weight: f32,
  pub bias: f32,
}

impl SalienceModel {
  pub fn new(vocab_size: usize) -> Self {
    Self {
      vocab_size,
      token_weights: vec![0.0; vocab_size],
      position_weight: 0.0,
      bias: 0.0,
    }
  }

  fn logit(&self, id: u32, rel_pos: f32) -> f32 {
    let weight = self
      .token_weights
      .get(id as usize)
      .or_else(|| self.token_weights.get(UNK_ID as usize))
      .copied()
      .unwrap_or(0.0);
    weight + self.position_weight * rel_pos + self.bias
  }

  /// Probability that token `id` at relative position `rel_pos` belongs in
  /// the summary.
  pub fn salience(&self, id: u32, rel_pos: f32) -> f32 {
    sigmoid(self.logit(id, rel_pos))
  }

  /// Mean token loss of one example, or `None` if it has no dialogue tokens.
  pub fn example_loss(&self, example: &TokenizedExample) -> Option<f32> {
    let targets = summary_tokens(example);
    let tokens = dialogue_tokens(example);
    if tokens.is_empty() {
      return None;
    }
    let len = tokens.len() as f32;
    let total: f32 = tokens
      .iter()
      .enumerate()
      .map(|(pos, id)| {
        let target = if targets.contains(id) { 1.0 } else { 0.0 };
        logistic_loss(self.logit(*id, pos as f32 / len), target)
      })
      .sum();
    Some(total / len)
  }

  /// Mean of `example_loss` over `examples`; 0 when nothing is scorable.
  pub fn mean_loss(&self, examples: &[TokenizedExample]) -> f32 {
    let losses: Vec<f32> = examples.iter().filter_map(|ex| self.example_loss(ex)).collect();
    if losses.is_empty() {
      0.0
    } else {
      losses.iter().sum::<f32>() / losses.len() as f32
    }
  }

  pub fn save(&self, path: &Path) -> Result<()> {
    let text = serde_json::to_string(self).map_err(SummarizerError::json(path))?;
    write_file(path, text)
  }

  pub fn load(path: &Path) -> Result<Self> {
    let text = fs::read_to_string(path).map_err(SummarizerError::io(path))?;
    let model: Self = serde_json::from_str(&text).map_err(SummarizerError::json(path))?;
    if model.token_weights.len() != model.vocab_size {
      return Err(SummarizerError::Dataset(format!(
        "model at '{}' declares {} tokens but stores {} weights",
        path.display(),
        model.vocab_size,
        model.token_weights.len()
      )));
    }
    Ok(model)
  }

  /// Extractive summary of `dialogue`: the highest scoring lines whose token
  /// count fits in `max_length`, in their original order, newline separated.
  /// The best line is always kept.
  pub fn summarize(
    &self,
    tokenizer: &Tokenizer,
    dialogue: &str,
    max_length: usize,
    length_penalty: f32,
  ) -> Result<String> {
    let mut utterances: Vec<(&str, Vec<u32>)> = Vec::new();
    for line in dialogue.lines().map(str::trim).filter(|l| !l.is_empty()) {
      let ids = encode(tokenizer, line)?;
      if !ids.is_empty() {
        utterances.push((line, ids));
      }
    }
    if utterances.is_empty() {
      return Ok(String::new());
    }

    let total_tokens: usize = utterances.iter().map(|(_, ids)| ids.len()).sum();
    let mut offset = 0usize;
    let mut scored: Vec<(usize, f32)> = Vec::with_capacity(utterances.len());
    for (idx, (_, ids)) in utterances.iter().enumerate() {
      let salience: f32 = ids
        .iter()
        .enumerate()
        .map(|(i, id)| self.salience(*id, (offset + i) as f32 / total_tokens as f32))
        .sum();
      offset += ids.len();
      scored.push((idx, salience / (ids.len() as f32).powf(length_penalty)));
    }
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut picked: Vec<usize> = Vec::new();
    let mut used = 0usize;
    for (idx, _) in scored {
      let len = utterances[idx].1.len();
      if picked.is_empty() || used + len <= max_length {
        picked.push(idx);
        used += len;
      }
    }
    picked.sort_unstable();

    Ok(picked.iter().map(|&idx| utterances[idx].0).collect::<Vec<_>>().join("\n"))
  }
}

fn dialogue_tokens(example: &TokenizedExample) -> Vec<u32> {
  example
    .input_ids
    .iter()
    .zip(&example.attention_mask)
    .filter(|(id, mask)| **mask == 1 && !is_special(**id))
    .map(|(id, _)| *id)
    .collect()
}

fn summary_tokens(example: &TokenizedExample) -> HashSet<u32> {
  example.labels.iter().copied().filter(|id| !is_special(*id)).collect()
}

/// Sparse gradient accumulated over the examples of one optimizer step.
#[derive(Default)]
struct Gradient {
  token_weights: HashMap<u32, f32>,
  position_weight: f32,
  bias: f32,
  examples: usize,
  loss_sum: f32,
}

impl Gradient {
  fn accumulate(&mut self, model: &SalienceModel, example: &TokenizedExample) {
    let targets = summary_tokens(example);
    let tokens = dialogue_tokens(example);
    if tokens.is_empty() {
      return;
    }
    let len = tokens.len() as f32;
    let mut loss = 0.0;
    for (pos, id) in tokens.iter().enumerate() {
      let rel_pos = pos as f32 / len;
      let target = if targets.contains(id) { 1.0 } else { 0.0 };
      let z = model.logit(*id, rel_pos);
      loss += logistic_loss(z, target);
      let g = (sigmoid(z) - target) / len;
      let slot = if (*id as usize) < model.vocab_size { *id } else { UNK_ID };
      *self.token_weights.entry(slot).or_insert(0.0) += g;
      self.position_weight += g * rel_pos;
      self.bias += g;
    }
    self.examples += 1;
    self.loss_sum += loss / len;
  }

  fn apply(&self, model: &mut SalienceModel, lr: f32, weight_decay: f32) {
    if self.examples == 0 {
      return;
    }
    let scale = lr / self.examples as f32;
    if weight_decay > 0.0 {
      let keep = 1.0 - lr * weight_decay;
      model.token_weights.iter_mut().for_each(|w| *w *= keep);
      model.position_weight *= keep;
    }
    for (id, g) in &self.token_weights {
      if let Some(w) = model.token_weights.get_mut(*id as usize) {
        *w -= scale * g;
      }
    }
    model.position_weight -= scale * self.position_weight;
    model.bias -= scale * self.bias;
  }
}

/// One entry of the training log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
  pub step: usize,
  pub epoch: f32,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub loss: Option<f32>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub learning_rate: Option<f32>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub eval_loss: Option<f32>,
}

/// Written next to the model once training finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerState {
  pub global_step: usize,
  pub num_train_epochs: usize,
  pub train_examples: usize,
  pub log_history: Vec<LogEntry>,
}

impl TrainerState {
  pub fn save(&self, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(self).map_err(SummarizerError::json(path))?;
    write_file(path, text)
  }
}

/// Optimizer steps per epoch for `n` examples.
pub fn steps_per_epoch(n: usize, args: &TrainingArguments) -> usize {
  let micro_batches = n.div_ceil(args.per_device_train_batch_size);
  micro_batches.div_ceil(args.gradient_accumulation_steps)
}

/// Fits `model` on `train` with mini-batch SGD.
///
/// `checkpoint` is called with the global step and the current model every
/// `save_steps` optimizer steps.
pub fn fit(
  model: &mut SalienceModel,
  train: &[TokenizedExample],
  eval: &[TokenizedExample],
  args: &TrainingArguments,
  mut checkpoint: impl FnMut(usize, &SalienceModel) -> Result<()>,
) -> Result<TrainerState> {
  if train.is_empty() {
    return Err(SummarizerError::Dataset("training split is empty".to_string()));
  }

  let per_epoch = steps_per_epoch(train.len(), args);
  let total_steps = per_epoch * args.num_train_epochs;
  let schedule = LinearSchedule::new(args.learning_rate, args.warmup_steps, total_steps);
  let mut rng = StdRng::seed_from_u64(args.seed);
  let mut order: Vec<usize> = (0..train.len()).collect();
  let evaluating = args.evaluation_strategy != EvaluationStrategy::No && !eval.is_empty();
  if args.evaluation_strategy != EvaluationStrategy::No && eval.is_empty() {
    tracing::warn!("No evaluation examples, eval_loss will not be recorded");
  }

  let mut log_history = Vec::new();
  let mut global_step = 0usize;
  let mut window_loss = 0.0f32;
  let mut window_examples = 0usize;

  tracing::info!(
    examples = train.len(),
    epochs = args.num_train_epochs,
    total_steps,
    "Starting training"
  );

  for epoch in 0..args.num_train_epochs {
    order.shuffle(&mut rng);
    let batches: Vec<&[usize]> = order.chunks(args.per_device_train_batch_size).collect();
    let mut grad = Gradient::default();

    for (batch_idx, batch) in batches.iter().enumerate() {
      for &idx in batch.iter() {
        grad.accumulate(model, &train[idx]);
      }
      let accumulated = (batch_idx + 1) % args.gradient_accumulation_steps == 0;
      if !accumulated && batch_idx + 1 != batches.len() {
        continue;
      }

      let lr = schedule.lr_at(global_step);
      grad.apply(model, lr, args.weight_decay);
      window_loss += grad.loss_sum;
      window_examples += grad.examples;
      grad = Gradient::default();
      global_step += 1;
      let epoch_progress = epoch as f32 + (batch_idx + 1) as f32 / batches.len() as f32;

      if global_step % args.logging_steps == 0 {
        let loss = window_loss / window_examples.max(1) as f32;
        tracing::info!(step = global_step, epoch = epoch_progress, loss, learning_rate = lr, "train");
        log_history.push(LogEntry {
          step: global_step,
          epoch: epoch_progress,
          loss: Some(loss),
          learning_rate: Some(lr),
          eval_loss: None,
        });
        window_loss = 0.0;
        window_examples = 0;
      }

      if evaluating && args.evaluation_strategy == EvaluationStrategy::Steps && global_step % args.eval_steps == 0 {
        log_history.push(evaluate(model, eval, global_step, epoch_progress));
      }

      if global_step % args.save_steps == 0 {
        checkpoint(global_step, model)?;
      }
    }

    if evaluating && args.evaluation_strategy == EvaluationStrategy::Epoch {
      log_history.push(evaluate(model, eval, global_step, (epoch + 1) as f32));
    }
  }

  tracing::info!(global_step, "Training finished");
  Ok(TrainerState {
    global_step,
    num_train_epochs: args.num_train_epochs,
    train_examples: train.len(),
    log_history,
  })
}

fn evaluate(model: &SalienceModel, eval: &[TokenizedExample], step: usize, epoch: f32) -> LogEntry {
  let eval_loss = model.mean_loss(eval);
  tracing::info!(step, epoch, eval_loss, "eval");
  LogEntry {
    step,
    epoch,
    loss: None,
    learning_rate: None,
    eval_loss: Some(eval_loss),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::tokenizer::{build_vocab, load_tokenizer, save_tokenizer};

  fn example(id: &str, input: &[u32], labels: &[u32]) -> TokenizedExample {
    let mut input_ids = input.to_vec();
    input_ids.push(EOS_ID);
    let mut label_ids = labels.to_vec();
    label_ids.push(EOS_ID);
    TokenizedExample {
      id: id.to_string(),
      dialogue: String::new(),
      summary: String::new(),
      attention_mask: vec![1; input_ids.len()],
      input_ids,
      labels: label_ids,
    }
  }

  fn args(epochs: usize) -> TrainingArguments {
    TrainingArguments {
      num_train_epochs: epochs,
      warmup_steps: 0,
      per_device_train_batch_size: 2,
      weight_decay: 0.0,
      logging_steps: 1,
      evaluation_strategy: EvaluationStrategy::Epoch,
      eval_steps: 1,
      save_steps: 3,
      gradient_accumulation_steps: 1,
      learning_rate: 1.0,
      seed: 7,
    }
  }

  fn corpus() -> Vec<TokenizedExample> {
    vec![
      example("1", &[3, 4, 5, 6], &[3, 4]),
      example("2", &[3, 7, 8, 4], &[3, 4]),
      example("3", &[5, 6, 3, 8], &[3]),
      example("4", &[7, 4, 6, 5], &[4]),
    ]
  }

  #[test]
  fn fitting_reduces_loss() {
    let data = corpus();
    let mut model = SalienceModel::new(10);
    let before = model.mean_loss(&data);
    let state = fit(&mut model, &data, &data, &args(20), |_, _| Ok(())).unwrap();
    let after = model.mean_loss(&data);

    assert!(after < before, "loss went from {before} to {after}");
    assert!(model.token_weights[3] > model.token_weights[5]);
    assert_eq!(state.global_step, 40);
  }

  #[test]
  fn fitting_is_deterministic_for_a_seed() {
    let data = corpus();
    let mut first = SalienceModel::new(10);
    let mut second = SalienceModel::new(10);
    fit(&mut first, &data, &[], &args(3), |_, _| Ok(())).unwrap();
    fit(&mut second, &data, &[], &args(3), |_, _| Ok(())).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn checkpoints_and_logs_follow_step_counts() {
    let data = corpus();
    let mut model = SalienceModel::new(10);
    let mut saved = Vec::new();
    let state = fit(&mut model, &data, &data, &args(3), |step, _| {
      saved.push(step);
      Ok(())
    })
    .unwrap();

    assert_eq!(saved, vec![3, 6]);
    let evals = state.log_history.iter().filter(|e| e.eval_loss.is_some()).count();
    assert_eq!(evals, 3);
    let train_logs = state.log_history.iter().filter(|e| e.loss.is_some()).count();
    assert_eq!(train_logs, 6);
  }

  #[test]
  fn missing_evaluation_data_records_no_eval_loss() {
    let data = corpus();
    let mut model = SalienceModel::new(10);
    let state = fit(&mut model, &data, &[], &args(2), |_, _| Ok(())).unwrap();

    assert!(state.log_history.iter().all(|e| e.eval_loss.is_none()));
    assert_eq!(state.log_history.len(), 4);
  }

  #[test]
  fn gradient_accumulation_merges_micro_batches() {
    let data = corpus();
    let mut accumulating = args(1);
    accumulating.per_device_train_batch_size = 1;
    accumulating.gradient_accumulation_steps = 3;
    assert_eq!(steps_per_epoch(data.len(), &accumulating), 2);

    let mut model = SalienceModel::new(10);
    let state = fit(&mut model, &data, &[], &accumulating, |_, _| Ok(())).unwrap();
    assert_eq!(state.global_step, 2);
  }

  #[test]
  fn empty_training_split_is_an_error() {
    let mut model = SalienceModel::new(10);
    let err = fit(&mut model, &[], &[], &args(1), |_, _| Ok(())).unwrap_err();
    assert!(matches!(err, SummarizerError::Dataset(_)));
  }

  #[test]
  fn summary_respects_budget_and_keeps_dialogue_order() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = build_vocab(["amanda cookies jerry sure later bye"], 50).unwrap();
    save_tokenizer(dir.path(), &vocab).unwrap();
    let tokenizer = load_tokenizer(dir.path()).unwrap();

    let mut model = SalienceModel::new(vocab.len());
    let id = |w: &str| vocab.iter().position(|v| v == w).unwrap();
    model.token_weights[id("cookies")] = 4.0;
    model.token_weights[id("later")] = 2.0;
    model.token_weights[id("bye")] = -4.0;

    let dialogue = "Jerry: bye\nAmanda: cookies\r\nJerry: sure later";
    // The runner-up line has 4 tokens and overflows a budget of 6; the last-ranked line fits.
    let summary = model.summarize(&tokenizer, dialogue, 6, 1.0).unwrap();
    assert_eq!(summary, "Jerry: bye\nAmanda: cookies");

    let tight = model.summarize(&tokenizer, dialogue, 1, 1.0).unwrap();
    assert_eq!(tight, "Amanda: cookies");
  }

  #[test]
  fn model_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join(MODEL_FILE);
    let mut model = SalienceModel::new(4);
    model.token_weights[3] = 0.25;
    model.save(&path).unwrap();
    assert_eq!(SalienceModel::load(&path).unwrap(), model);
  }
}
