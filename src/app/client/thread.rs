//! Comment thread and single-post retrieval
//!
//! A thread is returned by Reddit as a two-element array: the post listing
//! followed by the comment listing. Only the top-level comment nodes of the
//! second element are read, and their bodies are flattened into a list.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::app::client::http::{HttpHandler, RequestPermit};
use crate::app::models::{CommentNode, Item, Listing};
use crate::constants::{reddit, thread};
use crate::errors::{FetchError, FetchResult};

/// Fetches comment threads and single posts by id
///
/// Cheap to clone; clones share the transport.
#[derive(Debug, Clone)]
pub struct ThreadHandler {
    transport: Arc<HttpHandler>,
    api_base: Url,
}

impl ThreadHandler {
    pub fn new(transport: Arc<HttpHandler>, api_base: Url) -> Self {
        Self {
            transport,
            api_base,
        }
    }

    /// Fetches the flattened top-level comment bodies of a post
    ///
    /// # Errors
    ///
    /// - `FetchError::InvalidArgument` for a malformed id
    /// - `FetchError::Upstream` / `FetchError::Http` for request failures
    /// - `FetchError::MalformedResponse` if the envelope has fewer than two elements
    /// - `FetchError::Decode` if the comment listing does not parse
    pub async fn fetch_comments(&self, id: &str) -> FetchResult<Vec<String>> {
        let url = self.comments_url(id)?;
        let permit = self.transport.acquire().await;
        Self::request_comments(permit, &url).await
    }

    /// Same as [`fetch_comments`](Self::fetch_comments) with an already-acquired permit
    pub async fn fetch_comments_with(&self, permit: RequestPermit, id: &str) -> FetchResult<Vec<String>> {
        let url = self.comments_url(id)?;
        Self::request_comments(permit, &url).await
    }

    async fn request_comments(permit: RequestPermit, url: &Url) -> FetchResult<Vec<String>> {
        let envelope: Vec<serde_json::Value> = permit.get_json(url).await?;
        let comments = flatten_comments(envelope)?;
        debug!("Fetched {} comments from {}", comments.len(), url);
        Ok(comments)
    }

    /// Fetches one post's metadata by id, then best-effort attaches its comments
    ///
    /// A failure to fetch comments is logged and leaves `comments` empty; only a
    /// failed metadata lookup fails the call.
    ///
    /// # Errors
    ///
    /// - `FetchError::InvalidArgument` for a malformed id
    /// - `FetchError::Upstream` / `FetchError::Http` / `FetchError::Decode` for the lookup
    /// - `FetchError::NotFound` if the lookup returns no post
    pub async fn fetch_one(&self, id: &str) -> FetchResult<Item> {
        let url = self.by_id_url(id)?;
        let listing: Listing<Item> = self.transport.get_json(&url).await?;
        let mut item = listing
            .into_children()
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NotFound { id: id.to_string() })?;
        item.comments.clear();

        match self.fetch_comments(id).await {
            Ok(comments) => item.comments = comments,
            Err(e) => warn!("Could not fetch comments for post {}: {}", id, e),
        }

        Ok(item)
    }

    /// Builds `/comments/{id}?limit=100`
    fn comments_url(&self, id: &str) -> FetchResult<Url> {
        validate_id(id)?;
        let mut url = self.join(&format!("comments/{}", id))?;
        url.query_pairs_mut()
            .append_pair("limit", &thread::COMMENT_PAGE_LIMIT.to_string());
        Ok(url)
    }

    /// Builds `/by_id/t3_{id}`
    fn by_id_url(&self, id: &str) -> FetchResult<Url> {
        validate_id(id)?;
        self.join(&format!("by_id/{}{}", reddit::LINK_PREFIX, id))
    }

    fn join(&self, path: &str) -> FetchResult<Url> {
        self.api_base.join(path).map_err(|e| FetchError::InvalidUrl {
            url: path.to_string(),
            error: e.to_string(),
        })
    }
}

/// Extracts non-empty top-level comment bodies from a thread envelope
///
/// # Errors
///
/// `FetchError::MalformedResponse` for an envelope with fewer than two
/// elements, `FetchError::Decode` if the comment listing does not parse.
pub fn flatten_comments(mut envelope: Vec<serde_json::Value>) -> FetchResult<Vec<String>> {
    if envelope.len() < 2 {
        return Err(FetchError::MalformedResponse {
            reason: format!(
                "thread envelope has {} element(s), expected post and comments",
                envelope.len()
            ),
        });
    }

    let comments: Listing<CommentNode> = serde_json::from_value(envelope.swap_remove(1))?;
    Ok(comments
        .into_children()
        .into_iter()
        .map(|node| node.body)
        .filter(|body| !body.is_empty())
        .collect())
}

/// Post ids are base36, so ASCII alphanumerics only
fn validate_id(id: &str) -> FetchResult<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FetchError::invalid_argument(format!(
            "invalid post id: {:?}",
            id
        )));
    }
    Ok(())
}
