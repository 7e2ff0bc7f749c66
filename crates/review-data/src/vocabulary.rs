//! Sentiment-distinctive vocabulary.
//!
//! Tokens are whitespace-delimited units of the cleaned text, counted as-is
//! (no case folding, no punctuation stripping). Tokens that occur under all
//! three sentiments are removed from the display lists.

use std::collections::{BTreeMap, BTreeSet};

use review_core::models::{Aggregate, Sentiment};
use serde::Serialize;

use crate::filter::FilteredSubset;

/// One token and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// Token statistics for one sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentVocabulary {
    pub sentiment: Sentiment,
    /// Every token of the sentiment with its occurrence count.
    pub counts: BTreeMap<String, u64>,
    /// Tokens not shared by all three sentiments, most frequent first
    /// (ties broken by token), or `Empty` when none remain.
    pub distinctive: Aggregate<Vec<WordCount>>,
}

impl SentimentVocabulary {
    /// The `n` most frequent distinctive tokens.
    pub fn top(&self, n: usize) -> &[WordCount] {
        match self.distinctive.populated() {
            Some(words) => &words[..n.min(words.len())],
            None => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordFrequencyResult {
    pub positive: SentimentVocabulary,
    pub neutral: SentimentVocabulary,
    pub negative: SentimentVocabulary,
    /// Tokens present under every sentiment.
    pub common: BTreeSet<String>,
}

impl WordFrequencyResult {
    pub fn get(&self, sentiment: Sentiment) -> &SentimentVocabulary {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Neutral => &self.neutral,
            Sentiment::Negative => &self.negative,
        }
    }
}

/// Count tokens per sentiment and strip the vocabulary common to all three.
pub fn diff_vocabulary(subset: &FilteredSubset<'_>) -> WordFrequencyResult {
    let [positive, neutral, negative] = Sentiment::ALL.map(|s| count_tokens(subset, s));

    let common: BTreeSet<String> = positive
        .keys()
        .filter(|w| neutral.contains_key(*w) && negative.contains_key(*w))
        .cloned()
        .collect();

    WordFrequencyResult {
        positive: build(Sentiment::Positive, positive, &common),
        neutral: build(Sentiment::Neutral, neutral, &common),
        negative: build(Sentiment::Negative, negative, &common),
        common,
    }
}

fn count_tokens(subset: &FilteredSubset<'_>, sentiment: Sentiment) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for record in subset.iter().filter(|r| r.sentiment == Some(sentiment)) {
        for token in record.text.split_whitespace() {
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

fn build(
    sentiment: Sentiment,
    counts: BTreeMap<String, u64>,
    common: &BTreeSet<String>,
) -> SentimentVocabulary {
    let mut words: Vec<WordCount> = counts
        .iter()
        .filter(|(word, _)| !common.contains(*word))
        .map(|(word, &count)| WordCount {
            word: word.clone(),
            count,
        })
        .collect();
    // BTreeMap iteration already orders by token; the stable sort keeps that
    // as the tie-break.
    words.sort_by(|a, b| b.count.cmp(&a.count));

    let distinctive = if words.is_empty() {
        Aggregate::Empty
    } else {
        Aggregate::Populated(words)
    };

    SentimentVocabulary {
        sentiment,
        counts,
        distinctive,
    }
}
