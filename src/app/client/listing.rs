//! Top-listing retrieval with moderator-thread and link-post filtering

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::app::client::config::ListingConfig;
use crate::app::client::http::HttpHandler;
use crate::app::models::{Item, Listing, TimeWindow};
use crate::constants::listing;
use crate::errors::{FetchError, FetchResult};

/// Fetches and filters `top` listings
pub struct ListingHandler<'a> {
    transport: &'a Arc<HttpHandler>,
    api_base: &'a Url,
    config: &'a ListingConfig,
}

impl<'a> ListingHandler<'a> {
    pub fn new(transport: &'a Arc<HttpHandler>, api_base: &'a Url, config: &'a ListingConfig) -> Self {
        Self {
            transport,
            api_base,
            config,
        }
    }

    /// Retrieves up to `limit` self posts from the subreddit's top listing
    ///
    /// Arguments are validated before any request is issued. Fewer than
    /// `limit` items may come back if filtering discards too many entries.
    ///
    /// # Errors
    ///
    /// - `FetchError::InvalidArgument` for a bad window, subreddit name or zero limit
    /// - `FetchError::Upstream` for a non-2xx response
    /// - `FetchError::Decode` if the listing envelope does not parse
    pub async fn fetch_top(&self, subreddit: &str, limit: usize, window: &str) -> FetchResult<Vec<Item>> {
        let window: TimeWindow = window.parse()?;
        validate_subreddit(subreddit)?;
        if limit == 0 {
            return Err(FetchError::invalid_argument("limit must be greater than 0"));
        }

        let url = self.listing_url(subreddit, limit, window)?;
        let listing: Listing<Item> = self.transport.get_json(&url).await?;
        let raw = listing.into_children();
        let raw_count = raw.len();

        let retained = retain_candidates(raw, limit, &self.config.meta_markers);
        info!(
            "Fetched r/{} top/{}: {} raw entries, {} retained (limit {})",
            subreddit,
            window,
            raw_count,
            retained.len(),
            limit
        );
        Ok(retained)
    }

    /// Builds `/r/{subreddit}/top?limit=N&t={window}&raw_json=1`
    fn listing_url(&self, subreddit: &str, limit: usize, window: TimeWindow) -> FetchResult<Url> {
        let path = format!("r/{}/top", subreddit);
        let mut url = self.api_base.join(&path).map_err(|e| FetchError::InvalidUrl {
            url: path.clone(),
            error: e.to_string(),
        })?;

        let page_size = limit
            .saturating_add(self.config.overfetch)
            .min(listing::MAX_PAGE_SIZE);
        url.query_pairs_mut()
            .append_pair("limit", &page_size.to_string())
            .append_pair("t", window.as_str())
            .append_pair("raw_json", "1");

        debug!("Listing URL: {}", url);
        Ok(url)
    }
}

/// Applies the inclusion policy to raw listing entries, in upstream order
///
/// Entries whose title carries a meta marker are dropped first, then entries
/// that are not self posts. Scanning stops once `limit` entries are retained.
pub fn retain_candidates(raw: Vec<Item>, limit: usize, meta_markers: &[String]) -> Vec<Item> {
    let mut retained = Vec::with_capacity(limit.min(raw.len()));
    for item in raw {
        if retained.len() >= limit {
            break;
        }
        if item.title_matches_any(meta_markers) {
            debug!("Skipping meta thread {}: {}", item.id, item.title);
            continue;
        }
        if !item.is_self {
            debug!("Skipping link post {}", item.id);
            continue;
        }
        retained.push(item);
    }
    retained
}

/// Subreddit names are ASCII alphanumerics and underscores
fn validate_subreddit(subreddit: &str) -> FetchResult<()> {
    if subreddit.is_empty()
        || !subreddit
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(FetchError::invalid_argument(format!(
            "invalid subreddit name: {:?}",
            subreddit
        )));
    }
    Ok(())
}
