//! Data models for Reddit content
//!
//! This module defines the normalized [`Item`] record, the batch result returned
//! to callers, the listing time window, and the generic listing envelope used
//! by the Reddit API (`{"data": {"children": [{"data": ...}]}}`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::FetchError;

/// A single fetched post, normalized from the upstream `t3` thing
///
/// Field names follow the upstream JSON so that serialized items look like the
/// API's own. `comments` is never part of the upstream payload; it starts empty
/// and is only ever filled with non-empty comment bodies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// Upstream base36 identifier, the join key between listing and thread
    pub id: String,
    pub title: String,
    pub url: String,
    pub score: i64,
    /// Seconds since the epoch, fractional
    pub created_utc: f64,
    pub author: String,
    /// Comment count as reported by upstream, independent of `comments`
    pub num_comments: u64,
    pub selftext: String,
    /// True for text-only posts
    pub is_self: bool,
    pub comments: Vec<String>,
}

impl Item {
    /// Whether the title contains one of the given markers, case-insensitively
    pub fn title_matches_any(&self, markers: &[String]) -> bool {
        let title = self.title.to_lowercase();
        markers
            .iter()
            .any(|marker| title.contains(marker.to_lowercase().as_str()))
    }

    /// Creation time as a UTC timestamp, if representable
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let secs = self.created_utc.trunc() as i64;
        let nanos = (self.created_utc.fract() * 1e9) as u32;
        chrono::DateTime::from_timestamp(secs, nanos)
    }

    /// Same item with comments cleared, for metadata comparisons
    pub fn metadata(&self) -> Item {
        Item {
            comments: Vec::new(),
            ..self.clone()
        }
    }
}

/// Result of one orchestrated batch
///
/// Serializes as `{"subreddit": ..., "count": ..., "results": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchBatchResult {
    pub subreddit: String,
    /// Number of items actually returned, which may be below the requested limit
    pub count: usize,
    pub results: Vec<Item>,
}

impl FetchBatchResult {
    pub fn new(subreddit: impl Into<String>, results: Vec<Item>) -> Self {
        Self {
            subreddit: subreddit.into(),
            count: results.len(),
            results,
        }
    }
}

/// Time window for the `top` listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    /// Every accepted window, in increasing span
    pub const ALL: [TimeWindow; 6] = [
        TimeWindow::Hour,
        TimeWindow::Day,
        TimeWindow::Week,
        TimeWindow::Month,
        TimeWindow::Year,
        TimeWindow::All,
    ];

    /// Query-string value for the `t` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|window| window.as_str() == s)
            .ok_or_else(|| {
                FetchError::invalid_argument(format!(
                    "invalid time filter: {} (expected one of hour, day, week, month, year, all)",
                    s
                ))
            })
    }
}

/// Upstream listing envelope
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

/// Payload of a listing envelope
#[derive(Debug, Deserialize)]
pub struct ListingData<T> {
    pub children: Vec<Thing<T>>,
}

/// One child of a listing; the `kind` tag is ignored
#[derive(Debug, Deserialize)]
pub struct Thing<T> {
    pub data: T,
}

impl<T> Listing<T> {
    /// Unwrap the envelope into its children's payloads, preserving order
    pub fn into_children(self) -> Vec<T> {
        self.data.children.into_iter().map(|thing| thing.data).collect()
    }
}

/// Comment node as found in the second element of a thread envelope
///
/// `more` stubs and removed comments decode with an empty body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentNode {
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_parsing() {
        for window in TimeWindow::ALL {
            assert_eq!(window.as_str().parse::<TimeWindow>().unwrap(), window);
        }

        for bad in ["century", "", "Hour", "ALL", " day"] {
            let result = bad.parse::<TimeWindow>();
            assert!(
                matches!(result, Err(FetchError::InvalidArgument { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_item_decodes_upstream_fields() {
        let json = r#"{
            "id": "1abcde",
            "title": "AITA for testing?",
            "url": "https://www.reddit.com/r/AmItheAsshole/comments/1abcde/",
            "score": 4211,
            "created_utc": 1700000000.5,
            "author": "someone",
            "num_comments": 321,
            "selftext": "body text",
            "is_self": true,
            "subreddit": "AmItheAsshole",
            "over_18": false
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "1abcde");
        assert_eq!(item.score, 4211);
        assert_eq!(item.num_comments, 321);
        assert!(item.is_self);
        assert!(item.comments.is_empty());
        assert_eq!(item.created_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_title_marker_matching_is_case_insensitive() {
        let markers = vec!["open forum".to_string(), "monthly discussion".to_string()];
        let item = Item {
            title: "Monthly Discussion Thread - March".to_string(),
            ..Default::default()
        };
        assert!(item.title_matches_any(&markers));

        let item = Item {
            title: "WIBTA if I skipped the forum?".to_string(),
            ..Default::default()
        };
        assert!(!item.title_matches_any(&markers));
    }

    #[test]
    fn test_mixed_case_markers_match() {
        let markers = vec!["Open Forum".to_string()];
        let item = Item {
            title: "OPEN FORUM March".to_string(),
            ..Default::default()
        };
        assert!(item.title_matches_any(&markers));
    }

    #[test]
    fn test_batch_result_serialization_shape() {
        let result = FetchBatchResult::new(
            "AmItheAsshole",
            vec![Item {
                id: "x1".to_string(),
                comments: vec!["NTA".to_string()],
                ..Default::default()
            }],
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["subreddit"], "AmItheAsshole");
        assert_eq!(value["count"], 1);
        assert_eq!(value["results"][0]["id"], "x1");
        assert_eq!(value["results"][0]["comments"][0], "NTA");
    }

    #[test]
    fn test_listing_envelope_unwraps_in_order() {
        let json = r#"{"kind":"Listing","data":{"after":null,"children":[
            {"kind":"t1","data":{"body":"first"}},
            {"kind":"more","data":{"count":3,"children":["a","b"]}},
            {"kind":"t1","data":{"body":"second"}}
        ]}}"#;
        let listing: Listing<CommentNode> = serde_json::from_str(json).unwrap();
        let bodies: Vec<String> = listing.into_children().into_iter().map(|c| c.body).collect();
        assert_eq!(bodies, vec!["first", "", "second"]);
    }
}
