use std::collections::{HashMap, HashSet};

use crate::state::round3;

/// Token sequences longer than this are clipped before the LCS pass; the
/// DP table is quadratic in sequence length.
const MAX_LCS_TOKENS: usize = 512;

const STOPWORDS: &[&str] = &[
    "about", "after", "also", "been", "being", "between", "both", "each", "from", "have",
    "into", "more", "most", "other", "over", "such", "than", "that", "their", "them",
    "then", "these", "they", "this", "those", "when", "where", "which", "while", "with",
];

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| token.len() > 2)
        .map(str::to_string)
        .collect()
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Unigram token-set F1 between a gold text and a prediction. Cheap overlap
/// proxy, not a semantic metric.
pub fn unigram_f1(gold: &str, pred: &str) -> f64 {
    let gold_set: HashSet<String> = tokenize(gold).into_iter().collect();
    let pred_set: HashSet<String> = tokenize(pred).into_iter().collect();
    if gold_set.is_empty() || pred_set.is_empty() {
        return 0.0;
    }
    let overlap = gold_set.intersection(&pred_set).count() as f64;
    let precision = overlap / pred_set.len() as f64;
    let recall = overlap / gold_set.len() as f64;
    round3(f1(precision, recall))
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for token_a in a {
        for (j, token_b) in b.iter().enumerate() {
            current[j + 1] = if token_a == token_b {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// ROUGE-L F1: longest common subsequence over token sequences, so word
/// order matters, unlike [`unigram_f1`].
pub fn rouge_l_f1(gold: &str, pred: &str) -> f64 {
    let mut gold_tokens = tokenize(gold);
    let mut pred_tokens = tokenize(pred);
    gold_tokens.truncate(MAX_LCS_TOKENS);
    pred_tokens.truncate(MAX_LCS_TOKENS);
    if gold_tokens.is_empty() || pred_tokens.is_empty() {
        return 0.0;
    }
    let lcs = lcs_len(&gold_tokens, &pred_tokens) as f64;
    let precision = lcs / pred_tokens.len() as f64;
    let recall = lcs / gold_tokens.len() as f64;
    round3(f1(precision, recall))
}

/// Frequency-ranked keywords: tokens longer than 3 chars, stopwords
/// excluded, ties broken alphabetically.
pub fn rank_keywords(text: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokenize(text) {
        if token.len() > 3 && !STOPWORDS.contains(&token.as_str()) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(token, _)| token).collect()
}
