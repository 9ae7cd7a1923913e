// Vocabulary distribution over a whole corpus.
//
// All documents are flattened into one token multiset; document boundaries
// do not matter here. The frequency table is what the terminal report shows,
// the stats summarize how concentrated the vocabulary is.

use indexmap::IndexMap;
use serde::Serialize;

use crate::text::tokenize;

/// Number of most-frequent words used for the coverage statistic.
pub const COVERAGE_TOP_N: usize = 1000;

/// One row of the frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordFrequency {
    pub word: String,
    pub frequency: usize,
    /// Share of all tokens, in percent
    pub percentage: f64,
    /// Running sum of `percentage` down the table, in percent
    pub cumulative_percentage: f64,
}

/// Summary statistics for one corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocabularyStats {
    pub total_words: usize,
    pub unique_words: usize,
    /// Distinct words occurring at least `min_freq` times
    pub words_min_freq: usize,
    /// Percent of all tokens covered by the 1000 most frequent words
    /// (100 when the vocabulary is smaller than that)
    pub coverage_top_1000: f64,
}

/// Count words across `texts` and build the frequency table.
///
/// Rows are sorted by frequency, descending; equal frequencies keep the
/// order in which the words first appeared.
pub fn analyze_vocabulary<S: AsRef<str>>(
    texts: &[S],
    min_freq: usize,
) -> (Vec<WordFrequency>, VocabularyStats) {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for text in texts {
        for token in tokenize(text.as_ref()) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let total_words: usize = counts.values().sum();
    let unique_words = counts.len();
    let words_min_freq = counts.values().filter(|&&f| f >= min_freq).count();

    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    // sort_by is stable, so ties stay in first-seen order
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut table = Vec::with_capacity(sorted.len());
    let mut running = 0usize;
    for (word, frequency) in sorted {
        running += frequency;
        // Cumulative share comes from the integer running sum, so the last
        // row lands on exactly 100.
        table.push(WordFrequency {
            word: word.to_string(),
            frequency,
            percentage: frequency as f64 / total_words as f64 * 100.0,
            cumulative_percentage: running as f64 / total_words as f64 * 100.0,
        });
    }

    let coverage_top_1000 = if table.len() >= COVERAGE_TOP_N {
        let covered: usize = table[..COVERAGE_TOP_N].iter().map(|r| r.frequency).sum();
        covered as f64 / total_words as f64 * 100.0
    } else {
        100.0
    };

    let stats = VocabularyStats {
        total_words,
        unique_words,
        words_min_freq,
        coverage_top_1000,
    };

    (table, stats)
}
