use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use forumstats::analysis::{self, AnalysisParams};
use forumstats::config::Config;
use forumstats::forum::client::ForumClient;
use forumstats::forum::posts::{self, Post};
use forumstats::output::terminal;

/// forumstats: text statistics for comparing forum communities.
///
/// Fetches the newest posts of one or more forums and reports vocabulary
/// distribution, TF-IDF top terms, and per-post term frequencies over time.
#[derive(Parser)]
#[command(name = "forumstats", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and list the newest posts of a forum
    Fetch {
        /// Forum name, without the r/ prefix
        forum: String,

        /// Number of posts to collect
        #[arg(long, default_value = "100")]
        limit: usize,
    },

    /// Vocabulary statistics and top TF-IDF terms for one forum
    Analyze {
        forum: String,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Analyze several forums and compare their top terms
    Compare {
        /// Two or more forum names
        #[arg(required = true, num_args = 2..)]
        forums: Vec<String>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Per-post frequencies of chosen terms, optionally plotted by day
    Terms {
        forum: String,

        /// Term to track (repeat for several)
        #[arg(long = "term", required = true)]
        terms: Vec<String>,

        /// Number of posts to collect
        #[arg(long, default_value = "100")]
        limit: usize,

        /// Write a daily average TF chart (SVG) to this path
        #[arg(long)]
        plot: Option<PathBuf>,

        /// Chart title
        #[arg(long, default_value = forumstats::plot::DEFAULT_TITLE)]
        title: String,

        /// Max rows of the per-post table to print
        #[arg(long, default_value = "20")]
        rows: usize,
    },
}

#[derive(Args)]
struct AnalysisArgs {
    /// Number of posts to collect per forum
    #[arg(long, default_value = "100")]
    limit: usize,

    /// Vocabulary cap for TF-IDF
    #[arg(long, default_value = "1000")]
    max_terms: usize,

    /// Minimum number of posts a term must appear in
    #[arg(long, default_value = "2")]
    min_df: usize,

    /// Number of top terms to report
    #[arg(long, default_value = "5")]
    top_n: usize,

    /// Rows of the word frequency table to print
    #[arg(long, default_value = "0")]
    show_words: usize,
}

impl AnalysisArgs {
    fn params(&self) -> AnalysisParams {
        AnalysisParams {
            max_terms: self.max_terms,
            min_doc_freq: self.min_df,
            top_n_terms: self.top_n,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("forumstats=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Fetch { forum, limit } => {
            let client = build_client(&config)?;
            let posts = fetch_with_spinner(&client, &forum, limit).await?;
            terminal::display_post_list(&forum, &posts);
        }

        Commands::Analyze { forum, analysis: args } => {
            let client = build_client(&config)?;
            let posts = fetch_with_spinner(&client, &forum, args.limit).await?;

            println!("Analyzing {} posts...", posts.len());
            let report = analysis::analyze_forum(&posts, &args.params())?;
            terminal::display_forum_report(&forum, &report, args.show_words);
        }

        Commands::Compare { forums, analysis: args } => {
            let client = build_client(&config)?;
            let params = args.params();
            let mut fetched: Vec<(String, Vec<Post>)> = Vec::new();
            for forum in &forums {
                let posts = fetch_with_spinner(&client, forum, args.limit).await?;
                fetched.push((forum.clone(), posts));
            }

            let reports = analysis::analyze_forums(&fetched, &params)?;
            for (forum, report) in &reports {
                terminal::display_forum_report(forum, report, args.show_words);
            }
            terminal::display_comparison(&reports);
        }

        Commands::Terms {
            forum,
            terms,
            limit,
            plot,
            title,
            rows,
        } => {
            let client = build_client(&config)?;
            let posts = fetch_with_spinner(&client, &forum, limit).await?;

            let table = analysis::extract_term_frequencies(&posts, &terms);
            terminal::display_term_table(&table, rows);

            if let Some(path) = plot {
                forumstats::plot::plot_term_frequencies(&table, &terms, &title, &path)?;
                println!(
                    "\n{}",
                    format!("Chart saved to: {}", path.display()).bold()
                );
            }
        }
    }

    Ok(())
}

fn build_client(config: &Config) -> Result<ForumClient> {
    config.require_user_agent()?;
    Ok(ForumClient::new(&config.api_url, &config.user_agent)?.with_page_delay(config.page_delay))
}

/// Fetch posts while showing a spinner; pages are paced by the client's delay.
async fn fetch_with_spinner(client: &ForumClient, forum: &str, limit: usize) -> Result<Vec<Post>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Fetching up to {limit} posts from r/{forum}..."));
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = posts::fetch_forum_posts(client, forum, limit).await;
    pb.finish_and_clear();

    let posts = result?;
    if posts.len() < limit {
        info!(
            forum = forum,
            requested = limit,
            collected = posts.len(),
            "Collected fewer posts than requested"
        );
    }
    println!("Collected {} posts from r/{}", posts.len(), forum);
    Ok(posts)
}
