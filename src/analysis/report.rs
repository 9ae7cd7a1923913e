// Per-forum analysis report — vocabulary distribution plus TF-IDF top terms.
//
// Each forum is analyzed on its own: the vectorizer is fit on that forum's
// corpus only, so top terms describe what is distinctive *within* the forum.
// Comparing forums means comparing their reports side by side.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::tfidf::TfIdfVectorizer;
use super::vocabulary::{analyze_vocabulary, VocabularyStats, WordFrequency};
use crate::forum::posts::Post;
use crate::text::normalize;

/// Tuning knobs for [`analyze_forum`].
#[derive(Debug, Clone)]
pub struct AnalysisParams {
    /// Vocabulary cap for the vectorizer
    pub max_terms: usize,
    /// Minimum number of documents a term must appear in; also the
    /// `min_freq` threshold for the vocabulary stats
    pub min_doc_freq: usize,
    /// How many top terms to report
    pub top_n_terms: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            max_terms: 1000,
            min_doc_freq: 2,
            top_n_terms: 5,
        }
    }
}

/// A term and its mean TF-IDF weight across the corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

/// Everything computed for one forum's posts.
#[derive(Debug, Clone, Serialize)]
pub struct ForumReport {
    pub vocab_stats: VocabularyStats,
    pub freq_distribution: Vec<WordFrequency>,
    pub top_terms: Vec<TermScore>,
    /// Fitted vocabulary, alphabetically ordered
    pub feature_names: Vec<String>,
    /// `(documents, terms)`
    pub matrix_shape: (usize, usize),
    /// Percent of zero cells in the TF-IDF matrix
    pub matrix_sparsity: f64,
}

/// Title and body of each post, normalized and joined by a space.
pub fn post_corpus(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .map(|post| {
            format!(
                "{} {}",
                normalize(post.title.as_deref()),
                normalize(post.selftext.as_deref())
            )
        })
        .collect()
}

/// Analyze one forum's posts.
///
/// Vectorization failures (empty corpus, nothing left after stop words or
/// `min_doc_freq`) are returned as errors: a report without terms would be
/// meaningless.
pub fn analyze_forum(posts: &[Post], params: &AnalysisParams) -> Result<ForumReport> {
    let texts = post_corpus(posts);

    let (freq_distribution, vocab_stats) = analyze_vocabulary(&texts, params.min_doc_freq);

    let vectorizer = TfIdfVectorizer::new(Some(params.max_terms), params.min_doc_freq);
    let matrix = vectorizer
        .fit_transform(&texts)
        .with_context(|| format!("TF-IDF failed for a corpus of {} posts", posts.len()))?;

    let mut ranked: Vec<TermScore> = matrix
        .feature_names
        .iter()
        .zip(matrix.mean_scores())
        .map(|(term, score)| TermScore {
            term: term.clone(),
            score,
        })
        .collect();
    // Stable sort: equal scores stay alphabetical
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(params.top_n_terms);

    let matrix_shape = matrix.shape();
    let matrix_sparsity = matrix.sparsity();

    if let Some(top) = ranked.first() {
        info!(
            posts = posts.len(),
            terms = matrix_shape.1,
            top_term = %top.term,
            top_score = top.score,
            "Computed forum report"
        );
    }

    Ok(ForumReport {
        vocab_stats,
        freq_distribution,
        top_terms: ranked,
        feature_names: matrix.feature_names,
        matrix_shape,
        matrix_sparsity,
    })
}

/// Analyze several forums with the same parameters, in the given order.
///
/// Fails on the first forum whose posts cannot be analyzed, naming it in the
/// error.
pub fn analyze_forums(
    forums: &[(String, Vec<Post>)],
    params: &AnalysisParams,
) -> Result<Vec<(String, ForumReport)>> {
    forums
        .iter()
        .map(|(forum, posts)| {
            analyze_forum(posts, params)
                .with_context(|| format!("Analysis failed for r/{forum}"))
                .map(|report| (forum.clone(), report))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, body: &str) -> Post {
        Post {
            title: Some(title.to_string()),
            selftext: Some(body.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn corpus_joins_title_and_body() {
        let posts = vec![
            post("Hello, World!", "Body TEXT."),
            Post::default(),
        ];
        let corpus = post_corpus(&posts);
        assert_eq!(corpus[0], "hello world body text");
        assert_eq!(corpus[1], " ");
    }

    #[test]
    fn report_ranks_shared_terms() {
        let posts = vec![
            post("Rust borrow checker", "lifetimes and the borrow checker"),
            post("Async rust", "tokio runtime for rust services"),
            post("Rust macros", "declarative macros in rust"),
        ];
        let params = AnalysisParams {
            max_terms: 100,
            min_doc_freq: 2,
            top_n_terms: 3,
        };
        let report = analyze_forum(&posts, &params).unwrap();

        assert_eq!(report.matrix_shape.0, 3);
        assert!(report.feature_names.contains(&"rust".to_string()));
        assert_eq!(report.top_terms[0].term, "rust");
        assert!(report.top_terms.len() <= 3);
        assert!(report.matrix_sparsity >= 0.0 && report.matrix_sparsity <= 100.0);
    }

    #[test]
    fn empty_posts_fail() {
        let result = analyze_forum(&[], &AnalysisParams::default());
        assert!(result.is_err());
    }
}
