// Post fetching — paginated listing retrieval.
//
// Walks a forum's newest-first listing page by page until enough posts are
// collected, the API runs out of pages, or a request fails. A failed request
// ends collection but keeps what was already gathered.

use std::fmt;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use super::client::{ForumClient, MAX_PAGE_SIZE};

/// A single post record as served by the listing API.
///
/// Every field decodes on its own: a missing key, a `null`, or a value of the
/// wrong type falls back to the field's default instead of failing the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    /// Unix timestamp, seconds (may carry a fractional part); 0 when unusable
    #[serde(default, deserialize_with = "lenient")]
    pub created_utc: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    /// Body text; empty for link posts
    #[serde(default, deserialize_with = "lenient")]
    pub selftext: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub num_comments: Option<u64>,
}

/// Decode a field, substituting its default for `null` or a mistyped value.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Identifier of a post within an analysis table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PostId {
    /// Identifier assigned by the API
    Api(String),
    /// Zero-based position in the input, used when the record has no id
    Index(usize),
}

impl Post {
    /// The API id, or the post's position in its batch when there is none.
    pub fn post_id(&self, index: usize) -> PostId {
        match &self.id {
            Some(id) => PostId::Api(id.clone()),
            None => PostId::Index(index),
        }
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Api(id) => f.write_str(id),
            PostId::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Fetch up to `limit` of the newest posts from `forum`.
///
/// Requests `min(100, remaining)` posts per page and follows the `after`
/// cursor. Between pages the client's fixed delay is slept; there is no
/// retry and no backoff. Posts are returned in API order (newest first).
pub async fn fetch_forum_posts(
    client: &ForumClient,
    forum: &str,
    limit: usize,
) -> Result<Vec<Post>> {
    let mut posts: Vec<Post> = Vec::new();
    let mut after: Option<String> = None;

    while posts.len() < limit {
        if after.is_some() {
            tokio::time::sleep(client.page_delay()).await;
        }

        let page_size = MAX_PAGE_SIZE.min(limit - posts.len());
        let Some(listing) = client
            .fetch_listing_page(forum, page_size, after.as_deref())
            .await?
        else {
            break;
        };

        if listing.children.is_empty() {
            break;
        }

        let page_len = listing.children.len();
        posts.extend(listing.children.into_iter().map(|child| child.data));

        debug!(
            page_posts = page_len,
            total_collected = posts.len(),
            "Fetched page of posts for r/{}",
            forum
        );

        after = listing.after.filter(|cursor| !cursor.is_empty());
        if after.is_none() {
            break;
        }
    }

    posts.truncate(limit);

    info!(count = posts.len(), forum = forum, "Collected posts for analysis");

    Ok(posts)
}
