// TF-IDF vectorizer.
//
// Each document is one row; each retained vocabulary term is one column.
// The weighting follows the common scikit-learn defaults so numbers line up
// with notebook-based analyses of the same data:
//
//   tokens   words of two or more word characters, NLTK English stop words removed
//   tf       raw count of the term in the document
//   idf      ln((1 + n_docs) / (1 + df)) + 1
//   rows     L2-normalized
//
// The vectorizer is fit and discarded per corpus; nothing is cached.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use stop_words::{get, LANGUAGE};
use tracing::debug;

/// Words of at least two word characters.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("static regex is valid"));

/// Fits a vocabulary over a corpus and produces its TF-IDF matrix.
pub struct TfIdfVectorizer {
    /// Keep at most this many terms (highest corpus-wide counts win)
    pub max_features: Option<usize>,
    /// Drop terms that appear in fewer than this many documents
    pub min_df: usize,
    stop_words: HashSet<String>,
}

impl TfIdfVectorizer {
    /// A vectorizer with the NLTK English stop word list.
    pub fn new(max_features: Option<usize>, min_df: usize) -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self {
            max_features,
            min_df,
            stop_words: stop_words.into_iter().collect(),
        }
    }

    /// Replace the stop word list.
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Tokenize `text` the way the vectorizer sees it.
    pub fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        TOKEN
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|t| !self.stop_words.contains(t))
    }

    /// Learn the vocabulary of `documents` and return their weighted matrix.
    ///
    /// Fails when there is nothing to learn from: an empty corpus, fewer
    /// documents than `min_df`, a corpus made only of stop words, or a
    /// vocabulary emptied by `min_df` pruning.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<TfIdfMatrix> {
        if documents.is_empty() {
            anyhow::bail!("Cannot fit TF-IDF on an empty corpus");
        }
        if self.max_features == Some(0) {
            anyhow::bail!("max_features must be at least 1");
        }

        let n_docs = documents.len();
        let min_df = self.min_df.max(1);
        if min_df > n_docs {
            anyhow::bail!(
                "min_df={} exceeds the number of documents ({}); no term can qualify",
                min_df,
                n_docs
            );
        }

        // Per-document counts, plus corpus-wide (document frequency, total count)
        let doc_counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for token in self.tokens(doc.as_ref()) {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut corpus: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for counts in &doc_counts {
            for (term, &count) in counts {
                let entry = corpus.entry(term.as_str()).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += count;
            }
        }

        if corpus.is_empty() {
            anyhow::bail!("Empty vocabulary; the documents may contain only stop words");
        }

        let mut kept: Vec<(&str, usize, usize)> = corpus
            .into_iter()
            .filter(|(_, (df, _))| *df >= min_df)
            .map(|(term, (df, total))| (term, df, total))
            .collect();

        if kept.is_empty() {
            anyhow::bail!(
                "After pruning, no terms remain (min_df={}); try a lower minimum document frequency",
                min_df
            );
        }

        if let Some(limit) = self.max_features {
            if kept.len() > limit {
                // Highest total counts first; BTreeMap order makes ties alphabetical
                kept.sort_by(|a, b| b.2.cmp(&a.2));
                kept.truncate(limit);
                kept.sort_by(|a, b| a.0.cmp(b.0));
            }
        }

        let feature_names: Vec<String> = kept.iter().map(|(t, _, _)| t.to_string()).collect();
        let column: HashMap<&str, usize> = kept
            .iter()
            .enumerate()
            .map(|(j, (t, _, _))| (*t, j))
            .collect();
        let idf: Vec<f64> = kept
            .iter()
            .map(|(_, df, _)| ((1.0 + n_docs as f64) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<Vec<(usize, f64)>> = doc_counts
            .iter()
            .map(|counts| {
                let mut row: Vec<(usize, f64)> = counts
                    .iter()
                    .filter_map(|(term, &count)| {
                        column
                            .get(term.as_str())
                            .map(|&j| (j, count as f64 * idf[j]))
                    })
                    .collect();
                row.sort_by_key(|&(j, _)| j);

                let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, v) in &mut row {
                        *v /= norm;
                    }
                }
                row
            })
            .collect();

        debug!(
            documents = n_docs,
            terms = feature_names.len(),
            "Fitted TF-IDF vocabulary"
        );

        Ok(TfIdfMatrix {
            feature_names,
            idf,
            rows,
        })
    }
}

/// Sparse document-term matrix produced by [`TfIdfVectorizer::fit_transform`].
#[derive(Debug, Clone)]
pub struct TfIdfMatrix {
    /// Vocabulary, alphabetically ordered; index = column
    pub feature_names: Vec<String>,
    /// Inverse document frequency per column
    pub idf: Vec<f64>,
    /// Non-zero `(column, weight)` entries per document, column-ordered
    rows: Vec<Vec<(usize, f64)>>,
}

impl TfIdfMatrix {
    /// `(documents, terms)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.feature_names.len())
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Percentage of matrix cells that are zero.
    pub fn sparsity(&self) -> f64 {
        let (n_rows, n_cols) = self.shape();
        let cells = n_rows * n_cols;
        if cells == 0 {
            return 100.0;
        }
        100.0 * (1.0 - self.nnz() as f64 / cells as f64)
    }

    /// Non-zero entries of document `i`.
    pub fn row(&self, i: usize) -> &[(usize, f64)] {
        &self.rows[i]
    }

    /// Mean weight of every column across all documents, zeros included.
    pub fn mean_scores(&self) -> Vec<f64> {
        let (n_rows, n_cols) = self.shape();
        let mut sums = vec![0.0_f64; n_cols];
        for row in &self.rows {
            for &(j, v) in row {
                sums[j] += v;
            }
        }
        if n_rows > 0 {
            for s in &mut sums {
                *s /= n_rows as f64;
            }
        }
        sums
    }
}
