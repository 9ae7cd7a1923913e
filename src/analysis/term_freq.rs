// Per-post term frequencies for a small set of tracked terms.
//
// Unlike the forum report, only the post body is used here: titles are short
// and formulaic, and the time series is meant to follow how often a term
// shows up in what people actually write.

use chrono::DateTime;
use serde::Serialize;

use crate::forum::posts::{Post, PostId};
use crate::text::{normalize, tokenize};

/// Format of [`PostTermRow::created_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Count and frequency of one tracked term in one post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermStat {
    /// The term as the caller spelled it
    pub term: String,
    pub count: usize,
    /// `count / total_word_count`, or 0.0 for an empty post
    pub tf: f64,
}

/// One row of the per-post table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostTermRow {
    pub post_id: PostId,
    pub created_utc_unix: f64,
    /// UTC, `YYYY-MM-DD HH:MM:SS`
    pub created_date: String,
    /// One entry per tracked term, in tracking order
    pub terms: Vec<TermStat>,
    pub total_word_count: usize,
}

impl PostTermRow {
    /// Stats for `term`, matched exactly as it was tracked.
    pub fn term(&self, term: &str) -> Option<&TermStat> {
        self.terms.iter().find(|t| t.term == term)
    }

    /// Look up a numeric column by name: `{term}_count`, `{term}_tf`,
    /// `total_word_count` or `created_utc_unix`.
    pub fn column(&self, name: &str) -> Option<f64> {
        match name {
            "total_word_count" => return Some(self.total_word_count as f64),
            "created_utc_unix" => return Some(self.created_utc_unix),
            _ => {}
        }
        if let Some(term) = name.strip_suffix("_count") {
            if let Some(stat) = self.term(term) {
                return Some(stat.count as f64);
            }
        }
        if let Some(term) = name.strip_suffix("_tf") {
            if let Some(stat) = self.term(term) {
                return Some(stat.tf);
            }
        }
        None
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![
            "post_id".to_string(),
            "created_utc_unix".to_string(),
            "created_date".to_string(),
        ];
        for stat in &self.terms {
            names.push(format!("{}_count", stat.term));
            names.push(format!("{}_tf", stat.term));
        }
        names.push("total_word_count".to_string());
        names
    }
}

/// Convert Unix seconds to a UTC `YYYY-MM-DD HH:MM:SS` string.
///
/// Fractional seconds are dropped. Out-of-range timestamps give `None`.
pub fn format_timestamp(created_utc: f64) -> Option<String> {
    if !created_utc.is_finite() {
        return None;
    }
    let secs = created_utc.floor();
    let nanos = ((created_utc - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
        .map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// Count each tracked term in one piece of normalized text.
///
/// Matching is on whole tokens against the lowercased term.
pub fn term_frequencies<S: AsRef<str>>(text: &str, terms: &[S]) -> (Vec<TermStat>, usize) {
    let words: Vec<&str> = tokenize(text).collect();
    let total = words.len();

    let stats = terms
        .iter()
        .map(|term| {
            let term = term.as_ref();
            let needle = term.to_lowercase();
            let count = words.iter().filter(|w| **w == needle).count();
            let tf = if total > 0 {
                count as f64 / total as f64
            } else {
                0.0
            };
            TermStat {
                term: term.to_string(),
                count,
                tf,
            }
        })
        .collect();

    (stats, total)
}

/// Build the per-post table for `tracked_terms`, one row per post in input
/// order.
pub fn extract_term_frequencies<S: AsRef<str>>(
    posts: &[Post],
    tracked_terms: &[S],
) -> Vec<PostTermRow> {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let text = normalize(post.selftext.as_deref());
            let (terms, total_word_count) = term_frequencies(&text, tracked_terms);
            PostTermRow {
                post_id: post.post_id(i),
                created_utc_unix: post.created_utc,
                created_date: format_timestamp(post.created_utc).unwrap_or_default(),
                terms,
                total_word_count,
            }
        })
        .collect()
}
