// Forum listing API client — unauthenticated JSON over HTTP.
//
// Listing endpoints are public; the only identification is the User-Agent
// header, which the API operator uses to tell scripts apart. Pagination is
// driven by the opaque `after` cursor returned with every page.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use super::posts::{lenient, Post};

/// Default public listing API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.reddit.com";

/// Pause between successive page requests.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

/// Largest page the listing API will serve.
pub const MAX_PAGE_SIZE: usize = 100;

/// Thin reqwest wrapper for the `/r/{forum}/new` listing endpoint.
pub struct ForumClient {
    client: reqwest::Client,
    base_url: String,
    page_delay: Duration,
}

impl ForumClient {
    /// Create a client for the given base URL, identifying as `user_agent`.
    ///
    /// Pass a mock server URL for testing.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_delay: DEFAULT_PAGE_DELAY,
        })
    }

    /// Override the fixed delay between page requests.
    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn page_delay(&self) -> Duration {
        self.page_delay
    }

    /// Request one page of the newest posts in `forum`.
    ///
    /// Returns `Ok(None)` when the server answers with a non-success status
    /// or the request never completes; both are logged and mean "stop
    /// paginating". A body that does not decode as a listing is an error.
    pub async fn fetch_listing_page(
        &self,
        forum: &str,
        limit: usize,
        after: Option<&str>,
    ) -> Result<Option<Listing>> {
        let url = format!("{}/r/{}/new", self.base_url, forum);
        let limit = limit.to_string();

        let mut params: Vec<(&str, &str)> = vec![("limit", &limit)];
        if let Some(cursor) = after {
            params.push(("after", cursor));
        }

        debug!(forum = forum, limit = %limit, after = ?after, "Listing GET request");

        let response = match self.client.get(&url).query(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(forum = forum, error = %e, "Listing request failed");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            warn!(forum = forum, status = %status, "Error accessing r/{forum}: {status}");
            return Ok(None);
        }

        let listing = response
            .json::<ListingResponse>()
            .await
            .with_context(|| format!("Failed to decode listing for r/{forum}"))?;

        Ok(Some(listing.data))
    }
}

// -- Serde types for the listing envelope --

/// Top-level listing response: `{"kind": "Listing", "data": {...}}`.
#[derive(Debug, Deserialize)]
pub struct ListingResponse {
    pub data: Listing,
}

/// One page of results plus the cursor for the next page.
#[derive(Debug, Deserialize)]
pub struct Listing {
    /// Opaque cursor; `None` means there are no further pages.
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

/// A wrapped listing item: `{"kind": "t3", "data": {post}}`.
#[derive(Debug, Deserialize)]
pub struct ListingChild {
    #[serde(default, deserialize_with = "lenient")]
    pub data: Post,
}
