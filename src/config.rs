use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::forum::client::{DEFAULT_API_URL, DEFAULT_PAGE_DELAY};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. The library
/// itself never reads the environment; every threshold is a call argument and
/// this struct only feeds the CLI.
pub struct Config {
    /// Identifying User-Agent sent with every listing request.
    /// Reddit asks for something like `platform:app-name:v1.0 (by /u/you)`.
    pub user_agent: String,
    /// Base URL of the listing API (defaults to https://api.reddit.com).
    pub api_url: String,
    /// Fixed pause between successive page requests.
    pub page_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only the user agent lacks a default, and it is only needed for
    /// commands that hit the network.
    pub fn load() -> Result<Self> {
        let page_delay = match env::var("FORUMSTATS_PAGE_DELAY_SECS") {
            Ok(raw) => {
                let secs: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("FORUMSTATS_PAGE_DELAY_SECS is not a number: {raw}"))?;
                if !secs.is_finite() || secs < 0.0 {
                    anyhow::bail!("FORUMSTATS_PAGE_DELAY_SECS must be a non-negative number");
                }
                Duration::from_secs_f64(secs)
            }
            Err(_) => DEFAULT_PAGE_DELAY,
        };

        Ok(Self {
            user_agent: env::var("FORUMSTATS_USER_AGENT").unwrap_or_default(),
            api_url: env::var("FORUM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            page_delay,
        })
    }

    /// Check that a user agent is configured.
    /// Call this before any operation that fetches posts.
    pub fn require_user_agent(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            anyhow::bail!(
                "FORUMSTATS_USER_AGENT not set. Add it to your .env file, e.g.\n\
                 FORUMSTATS_USER_AGENT=\"textanalysis/1.0 (by /u/your_username)\""
            );
        }
        Ok(())
    }
}
