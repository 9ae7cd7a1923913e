// Unit tests for normalization, vocabulary stats, TF-IDF reports and the
// per-post term table.
//
// All pure functions: no network, no filesystem.

use forumstats::analysis::term_freq::extract_term_frequencies;
use forumstats::analysis::{analyze_forum, analyze_forums, analyze_vocabulary, AnalysisParams};
use forumstats::forum::posts::{Post, PostId};
use forumstats::text::{normalize, normalize_str};

fn body(text: &str, created_utc: f64) -> Post {
    Post {
        selftext: Some(text.to_string()),
        created_utc,
        ..Default::default()
    }
}

fn titled(id: &str, title: &str, text: &str) -> Post {
    Post {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        selftext: Some(text.to_string()),
        ..Default::default()
    }
}

// ============================================================
// Normalizer
// ============================================================

#[test]
fn punctuation_only_normalizes_to_empty() {
    for text in ["!!!", "...", "?!,;:", "-- ** //", "“”‘’"] {
        assert_eq!(normalize_str(text), "", "input {text:?}");
    }
}

#[test]
fn normalizer_is_idempotent() {
    let once = normalize_str("  Hey!!  What's   UP?\n\tnothing  ");
    assert_eq!(once, "hey whats up nothing");
    assert_eq!(normalize_str(&once), once);
}

#[test]
fn missing_field_normalizes_to_empty() {
    assert_eq!(normalize(None), "");
    assert_eq!(normalize(Some("A")), "a");
}

// ============================================================
// Vocabulary analyzer
// ============================================================

#[test]
fn vocabulary_scenario_a_a_b() {
    let (table, stats) = analyze_vocabulary(&["a a b"], 2);
    assert_eq!(table[0].word, "a");
    assert_eq!(table[0].frequency, 2);
    assert_eq!(table[1].word, "b");
    assert_eq!(table[1].frequency, 1);
    assert_eq!(stats.words_min_freq, 1);
}

#[test]
fn cumulative_percentage_ends_at_100() {
    let texts = [
        "the quick brown fox jumps over the lazy dog",
        "the dog sleeps",
        "foxes and dogs and cats",
    ];
    let (table, _) = analyze_vocabulary(&texts, 1);
    let last = table.last().unwrap().cumulative_percentage;
    assert!((last - 100.0).abs() < 1e-9, "last cumulative {last}");
    assert!(table.iter().all(|r| r.cumulative_percentage <= 100.0 + 1e-9));
}

#[test]
fn percentages_sum_to_100() {
    let (table, _) = analyze_vocabulary(&["x y z x y x"], 1);
    let sum: f64 = table.iter().map(|r| r.percentage).sum();
    assert!((sum - 100.0).abs() < 1e-9);
}

// ============================================================
// Forum report
// ============================================================

#[test]
fn report_surfaces_distinctive_terms() {
    let posts = vec![
        titled("1", "Sourdough starter help", "My sourdough starter smells sour"),
        titled("2", "Sourdough crumb", "Open crumb from a wet sourdough"),
        titled("3", "Starter feeding", "How often do you feed a starter"),
        titled("4", "Baguette shaping", "Shaping baguette dough is hard"),
        titled("5", "Crumb shot", "Tight crumb on my baguette"),
    ];
    let params = AnalysisParams {
        max_terms: 50,
        min_doc_freq: 2,
        top_n_terms: 3,
    };
    let report = analyze_forum(&posts, &params).unwrap();

    assert_eq!(report.matrix_shape.0, 5);
    assert_eq!(report.matrix_shape.1, report.feature_names.len());
    assert_eq!(report.top_terms.len(), 3);
    for pair in report.top_terms.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    let top: Vec<&str> = report.top_terms.iter().map(|t| t.term.as_str()).collect();
    assert!(top.contains(&"sourdough") || top.contains(&"starter") || top.contains(&"crumb"));
    // Stop words never make it into the vocabulary
    assert!(!report.feature_names.iter().any(|t| t == "my" || t == "a"));
}

#[test]
fn report_vocab_stats_use_min_doc_freq() {
    let posts = vec![
        titled("1", "alpha beta", "gamma"),
        titled("2", "alpha", "beta"),
    ];
    let params = AnalysisParams {
        max_terms: 10,
        min_doc_freq: 2,
        top_n_terms: 5,
    };
    let report = analyze_forum(&posts, &params).unwrap();
    assert_eq!(report.vocab_stats.total_words, 5);
    assert_eq!(report.vocab_stats.unique_words, 3);
    // alpha and beta reach 2 occurrences
    assert_eq!(report.vocab_stats.words_min_freq, 2);
}

#[test]
fn report_fails_when_everything_is_pruned() {
    let posts = vec![
        titled("1", "unique words here", ""),
        titled("2", "different vocabulary entirely", ""),
    ];
    let result = analyze_forum(&posts, &AnalysisParams::default());
    assert!(result.is_err(), "pruned vocabulary must surface as an error");
}

#[test]
fn report_fails_on_stop_words_only() {
    let posts = vec![titled("1", "the", "and of the"), titled("2", "a", "the an")];
    let params = AnalysisParams {
        min_doc_freq: 1,
        ..Default::default()
    };
    assert!(analyze_forum(&posts, &params).is_err());
}

#[test]
fn max_terms_caps_the_vocabulary() {
    let posts = vec![
        titled("1", "apple banana cherry", "durian elderberry"),
        titled("2", "apple banana cherry", "durian elderberry"),
    ];
    let params = AnalysisParams {
        max_terms: 2,
        min_doc_freq: 1,
        top_n_terms: 10,
    };
    let report = analyze_forum(&posts, &params).unwrap();
    assert_eq!(report.matrix_shape, (2, 2));
    assert_eq!(report.top_terms.len(), 2);
    assert!((report.matrix_sparsity - 0.0).abs() < 1e-12);
}

#[test]
fn everyday_words_reach_the_top_terms() {
    let posts = vec![
        titled("1", "new people like time", ""),
        titled("2", "new people want help", ""),
        titled("3", "new time work", ""),
    ];
    let report = analyze_forum(&posts, &AnalysisParams::default()).unwrap();
    assert_eq!(report.feature_names, vec!["new", "people", "time"]);
    // "new" is in every post
    assert_eq!(report.top_terms[0].term, "new");
}

#[test]
fn comparison_reports_every_forum_in_order() {
    let forums = vec![
        (
            "bread".to_string(),
            vec![titled("1", "sourdough starter", ""), titled("2", "sourdough crumb", "")],
        ),
        (
            "rust".to_string(),
            vec![titled("3", "rust borrow", ""), titled("4", "rust async", "")],
        ),
    ];
    let reports = analyze_forums(&forums, &AnalysisParams::default()).unwrap();
    let names: Vec<&str> = reports.iter().map(|(f, _)| f.as_str()).collect();
    assert_eq!(names, vec!["bread", "rust"]);
    assert_eq!(reports[0].1.top_terms[0].term, "sourdough");
    assert_eq!(reports[1].1.top_terms[0].term, "rust");
}

#[test]
fn comparison_fails_when_one_forum_cannot_be_analyzed() {
    let forums = vec![
        (
            "rust".to_string(),
            vec![titled("1", "rust borrow", ""), titled("2", "rust async", "")],
        ),
        (
            "quiet".to_string(),
            vec![titled("3", "the", "and"), titled("4", "of", "the")],
        ),
    ];
    let err = analyze_forums(&forums, &AnalysisParams::default()).unwrap_err();
    assert!(format!("{err:#}").contains("r/quiet"), "unexpected error: {err:#}");
}

// ============================================================
// Per-post term frequencies
// ============================================================

#[test]
fn cat_cat_dog_scenario() {
    let rows = extract_term_frequencies(&[body("cat cat dog", 0.0)], &["cat", "dog"]);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];

    let cat = row.term("cat").unwrap();
    let dog = row.term("dog").unwrap();
    assert_eq!(cat.count, 2);
    assert!((cat.tf - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(dog.count, 1);
    assert!((dog.tf - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(row.total_word_count, 3);
    assert_eq!(row.created_date, "1970-01-01 00:00:00");
    assert_eq!(row.post_id, PostId::Index(0));
}

#[test]
fn empty_body_has_zero_tf() {
    let posts = vec![body("", 0.0), Post::default(), body("?!?", 0.0)];
    let rows = extract_term_frequencies(&posts, &["rust", "go"]);
    for row in &rows {
        assert_eq!(row.total_word_count, 0);
        for stat in &row.terms {
            assert_eq!(stat.count, 0);
            assert_eq!(stat.tf, 0.0);
        }
    }
}

#[test]
fn tracked_terms_match_case_insensitively() {
    let rows = extract_term_frequencies(&[body("I like apple. APPLE pie!", 0.0)], &["Apple"]);
    let apple = rows[0].term("Apple").unwrap();
    assert_eq!(apple.count, 2);
    assert_eq!(rows[0].column("Apple_count"), Some(2.0));
}

#[test]
fn title_is_not_counted() {
    let post = titled("x", "rust rust rust", "nothing here");
    let rows = extract_term_frequencies(&[post], &["rust"]);
    assert_eq!(rows[0].term("rust").unwrap().count, 0);
    assert_eq!(rows[0].post_id, PostId::Api("x".to_string()));
}

#[test]
fn rows_keep_input_order_and_index_fallback() {
    let posts = vec![
        titled("first", "", "one"),
        body("two", 86_400.0),
        titled("third", "", "three"),
    ];
    let rows = extract_term_frequencies(&posts, &["two"]);
    let ids: Vec<String> = rows.iter().map(|r| r.post_id.to_string()).collect();
    assert_eq!(ids, vec!["first", "1", "third"]);
    assert_eq!(rows[1].created_date, "1970-01-02 00:00:00");
    assert_eq!(rows[1].term("two").unwrap().tf, 1.0);
}
