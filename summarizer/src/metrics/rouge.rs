// text-summarizer/src/metrics/rouge.rs

//! ROUGE F-measures: n-gram overlap (rouge1, rouge2), longest common
//! subsequence (rougeL) and its summary-level variant over newline separated
//! sentences (rougeLsum).
//!
//! Text is lowercased and every run of characters outside `[a-z0-9]` acts as a
//! separator. No stemming.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RougeScores {
  pub rouge1: f64,
  pub rouge2: f64,
  #[serde(rename = "rougeL")]
  pub rouge_l: f64,
  #[serde(rename = "rougeLsum")]
  pub rouge_lsum: f64,
}

impl RougeScores {
  /// Scores of one prediction against one reference.
  pub fn score(prediction: &str, reference: &str) -> Self {
    let pred = tokenize(prediction);
    let refr = tokenize(reference);
    Self {
      rouge1: ngram_f1(&refr, &pred, 1),
      rouge2: ngram_f1(&refr, &pred, 2),
      rouge_l: f1(lcs_len(&refr, &pred), pred.len(), refr.len()),
      rouge_lsum: summary_level_lcs_f1(&sentences(reference), &sentences(prediction)),
    }
  }

  /// Mean scores over aligned prediction/reference pairs. Zero when empty.
  pub fn corpus<S: AsRef<str>>(predictions: &[S], references: &[S]) -> Self {
    let n = predictions.len().min(references.len());
    if n == 0 {
      return Self::default();
    }
    let sum = predictions
      .iter()
      .zip(references)
      .map(|(p, r)| Self::score(p.as_ref(), r.as_ref()))
      .fold(Self::default(), |acc, s| Self {
        rouge1: acc.rouge1 + s.rouge1,
        rouge2: acc.rouge2 + s.rouge2,
        rouge_l: acc.rouge_l + s.rouge_l,
        rouge_lsum: acc.rouge_lsum + s.rouge_lsum,
      });
    let n = n as f64;
    Self {
      rouge1: sum.rouge1 / n,
      rouge2: sum.rouge2 / n,
      rouge_l: sum.rouge_l / n,
      rouge_lsum: sum.rouge_lsum / n,
    }
  }
}

pub fn tokenize(text: &str) -> Vec<String> {
  let lowered = text.to_lowercase();
  NON_ALNUM
    .split(&lowered)
    .filter(|t| !t.is_empty())
    .map(str::to_string)
    .collect()
}

fn sentences(text: &str) -> Vec<Vec<String>> {
  text.split('\n').map(tokenize).collect()
}

fn f1(hits: usize, pred_len: usize, ref_len: usize) -> f64 {
  if hits == 0 || pred_len == 0 || ref_len == 0 {
    return 0.0;
  }
  let precision = hits as f64 / pred_len as f64;
  let recall = hits as f64 / ref_len as f64;
  2.0 * precision * recall / (precision + recall)
}

fn counts<T: Eq + Hash>(items: impl IntoIterator<Item = T>) -> HashMap<T, usize> {
  let mut map = HashMap::new();
  for item in items {
    *map.entry(item).or_insert(0) += 1;
  }
  map
}

fn ngram_f1(reference: &[String], prediction: &[String], n: usize) -> f64 {
  let ref_counts = counts(reference.windows(n));
  let pred_counts = counts(prediction.windows(n));
  let hits: usize = pred_counts
    .iter()
    .map(|(gram, c)| (*c).min(ref_counts.get(gram).copied().unwrap_or(0)))
    .sum();
  f1(
    hits,
    prediction.len().saturating_sub(n - 1),
    reference.len().saturating_sub(n - 1),
  )
}

fn lcs_table(a: &[String], b: &[String]) -> Vec<Vec<usize>> {
  let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
  for i in 1..=a.len() {
    for j in 1..=b.len() {
      table[i][j] = if a[i - 1] == b[j - 1] {
        table[i - 1][j - 1] + 1
      } else {
        table[i - 1][j].max(table[i][j - 1])
      };
    }
  }
  table
}

pub fn lcs_len(a: &[String], b: &[String]) -> usize {
  lcs_table(a, b)[a.len()][b.len()]
}

/// Indices into `a` of one longest common subsequence with `b`.
fn lcs_indices(a: &[String], b: &[String]) -> Vec<usize> {
  let table = lcs_table(a, b);
  let (mut i, mut j) = (a.len(), b.len());
  let mut indices = Vec::new();
  while i > 0 && j > 0 {
    if a[i - 1] == b[j - 1] {
      indices.push(i - 1);
      i -= 1;
      j -= 1;
    } else if table[i][j - 1] > table[i - 1][j] {
      j -= 1;
    } else {
      i -= 1;
    }
  }
  indices.reverse();
  indices
}

/// Tokens of `reference` covered by the union of its LCS with each candidate
/// sentence, in reference order.
fn union_lcs<'a>(reference: &'a [String], candidates: &[Vec<String>]) -> Vec<&'a String> {
  let mut covered: Vec<usize> = candidates.iter().flat_map(|c| lcs_indices(reference, c)).collect();
  covered.sort_unstable();
  covered.dedup();
  covered.into_iter().map(|i| &reference[i]).collect()
}

fn summary_level_lcs_f1(references: &[Vec<String>], candidates: &[Vec<String>]) -> f64 {
  let ref_total: usize = references.iter().map(Vec::len).sum();
  let cand_total: usize = candidates.iter().map(Vec::len).sum();
  if ref_total == 0 || cand_total == 0 {
    return 0.0;
  }

  let mut ref_left = counts(references.iter().flatten());
  let mut cand_left = counts(candidates.iter().flatten());
  let mut hits = 0usize;
  for sentence in references {
    for token in union_lcs(sentence, candidates) {
      let (Some(r), Some(c)) = (ref_left.get_mut(token), cand_left.get_mut(token)) else {
        continue;
      };
      if *r > 0 && *c > 0 {
        *r -= 1;
        *c -= 1;
        hits += 1;
      }
    }
  }
  f1(hits, cand_total, ref_total)
}
