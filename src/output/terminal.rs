// Colored terminal output for fetched posts and analysis reports.
//
// This module handles all terminal-specific formatting. main.rs only decides
// what to show; the layout lives here.

use colored::Colorize;

use crate::analysis::{ForumReport, PostTermRow};
use crate::forum::posts::Post;

/// Display fetched posts, newest first.
pub fn display_post_list(forum: &str, posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts collected from r/{forum}.");
        return;
    }

    println!(
        "\n{}",
        format!("=== r/{} ({} posts) ===", forum, posts.len()).bold()
    );
    println!();

    for (i, post) in posts.iter().enumerate() {
        let id = post.post_id(i).to_string();
        let title = post.title.as_deref().unwrap_or("");
        let created = crate::analysis::term_freq::format_timestamp(post.created_utc)
            .unwrap_or_else(|| "?".to_string());
        println!(
            "  {:>4}. {:<10} {}  {}",
            i + 1,
            id.dimmed(),
            created.dimmed(),
            super::truncate_chars(title, 80)
        );
        println!("        {}", byline(post).dimmed());
    }
}

/// Author, score and comment count of a post, e.g. `by alice | 12 points | 3 comments`.
fn byline(post: &Post) -> String {
    let author = post.author.as_deref().unwrap_or("[deleted]");
    let score = post
        .score
        .map_or_else(|| "?".to_string(), |s| s.to_string());
    format!(
        "by {} | {} points | {} comments",
        super::truncate_chars(author, 24),
        score,
        post.num_comments.unwrap_or(0)
    )
}

/// Display one forum's vocabulary stats, top terms and matrix summary.
///
/// `show_words` controls how many rows of the frequency table are printed.
pub fn display_forum_report(forum: &str, report: &ForumReport, show_words: usize) {
    println!("\n{}", format!("=== Analysis for r/{forum} ===").bold());

    let stats = &report.vocab_stats;
    println!("\n  Vocabulary:");
    println!("    Total words:       {}", stats.total_words);
    println!("    Unique words:      {}", stats.unique_words);
    println!("    Words >= min freq: {}", stats.words_min_freq);
    println!("    Top-1000 coverage: {:.1}%", stats.coverage_top_1000);

    if show_words > 0 && !report.freq_distribution.is_empty() {
        println!(
            "\n  {:<20} {:>8} {:>8} {:>8}",
            "Word".dimmed(),
            "Freq".dimmed(),
            "%".dimmed(),
            "Cum %".dimmed()
        );
        for row in report.freq_distribution.iter().take(show_words) {
            println!(
                "  {:<20} {:>8} {:>8.2} {:>8.2}",
                super::truncate_chars(&row.word, 20),
                row.frequency,
                row.percentage,
                row.cumulative_percentage
            );
        }
    }

    println!("\n  Top terms (mean TF-IDF):");
    for (i, term) in report.top_terms.iter().enumerate() {
        println!(
            "    {:>2}. {:<24} {}",
            i + 1,
            term.term.bold(),
            format!("{:.4}", term.score).bright_green()
        );
    }

    let (docs, terms) = report.matrix_shape;
    println!(
        "\n  Matrix: {} documents x {} terms, {:.2}% sparse",
        docs, terms, report.matrix_sparsity
    );
}

/// Display the top terms of several forums side by side.
pub fn display_comparison(reports: &[(String, ForumReport)]) {
    if reports.is_empty() {
        return;
    }

    println!("\n{}", "=== Top Terms by Forum ===".bold());
    println!();

    let col = 26;
    let header: String = reports
        .iter()
        .map(|(forum, _)| format!("{:<col$}", super::truncate_chars(&format!("r/{forum}"), col - 4)))
        .collect();
    println!("  {:>4}  {}", "#".dimmed(), header.bold());

    let depth = reports
        .iter()
        .map(|(_, r)| r.top_terms.len())
        .max()
        .unwrap_or(0);

    for rank in 0..depth {
        let cells: String = reports
            .iter()
            .map(|(_, r)| match r.top_terms.get(rank) {
                Some(t) => {
                    let cell = format!("{} ({:.3})", super::truncate_chars(&t.term, 14), t.score);
                    format!("{cell:<col$}")
                }
                None => " ".repeat(col),
            })
            .collect();
        println!("  {:>4}. {}", rank + 1, cells);
    }

    println!();
    for (forum, r) in reports {
        println!(
            "  r/{:<22} {:>6} words, {:>6} unique, {:>5.1}% sparse",
            forum, r.vocab_stats.total_words, r.vocab_stats.unique_words, r.matrix_sparsity
        );
    }
}

/// Display the per-post term table, at most `max_rows` rows.
pub fn display_term_table(rows: &[PostTermRow], max_rows: usize) {
    let Some(first) = rows.first() else {
        println!("No posts to tabulate.");
        return;
    };

    let mut header = format!("  {:<10} {:<19}", "post_id", "created_date");
    for stat in &first.terms {
        header.push_str(&format!(" {:>8} {:>8}", format!("{}_n", stat.term), format!("{}_tf", stat.term)));
    }
    header.push_str(&format!(" {:>6}", "words"));
    println!("\n{}", header.dimmed());

    for row in rows.iter().take(max_rows) {
        let mut line = format!(
            "  {:<10} {:<19}",
            super::truncate_chars(&row.post_id.to_string(), 10),
            row.created_date
        );
        for stat in &row.terms {
            line.push_str(&format!(" {:>8} {:>8.4}", stat.count, stat.tf));
        }
        line.push_str(&format!(" {:>6}", row.total_word_count));
        println!("{line}");
    }

    if rows.len() > max_rows {
        println!("  {}", format!("... {} more rows", rows.len() - max_rows).dimmed());
    }

    println!();
    for stat in &first.terms {
        let total: usize = rows
            .iter()
            .filter_map(|r| r.term(&stat.term))
            .map(|s| s.count)
            .sum();
        let mentioned = rows
            .iter()
            .filter(|r| r.term(&stat.term).is_some_and(|s| s.count > 0))
            .count();
        println!(
            "  {:<16} {} occurrences in {} of {} posts",
            stat.term.bold(),
            total,
            mentioned,
            rows.len()
        );
    }
}
