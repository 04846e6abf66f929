//! The extracted post record and its documented defaults.

use serde::{Deserialize, Serialize};

/// Placeholder when no date probe matched.
pub const UNKNOWN_DATE: &str = "Unknown date";
/// Placeholder when no reaction-count probe matched.
pub const NO_REACTIONS: &str = "0";
/// Placeholder when no comment-summary probe matched.
pub const NO_COMMENTS: &str = "0 comments";
/// Placeholder when no repost-summary probe matched.
pub const NO_REPOSTS: &str = "0 reposts";

/// One extracted feed post.
///
/// `text` is always non-empty — items whose body cannot be resolved are
/// dropped, never emitted blank. Every other display field degrades to its
/// documented default instead of failing the record. The two derived
/// fields are absent (and omitted from JSON) when the item carried no
/// identifier attribute or the identifier failed to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// 1-based position of the item in the scanned list of the pass that
    /// produced it. Skipped items consume an index, so gaps are possible.
    pub index: usize,
    /// Display string for the post time, relative or absolute.
    pub date: String,
    /// Post body text. Never empty.
    pub text: String,
    /// Reaction count as displayed.
    pub reactions: String,
    /// Comment summary as displayed.
    pub comments: String,
    /// Repost summary as displayed.
    pub reposts: String,
    /// Absolute permalink derived from the item identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_permalink: Option<String>,
    /// Approximate upload time in epoch seconds, decoded from the
    /// identifier. An ordering hint, not a wall-clock value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_upload_epoch: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let post = Post {
            index: 1,
            date: UNKNOWN_DATE.to_string(),
            text: "hello".to_string(),
            reactions: NO_REACTIONS.to_string(),
            comments: NO_COMMENTS.to_string(),
            reposts: NO_REPOSTS.to_string(),
            activity_permalink: None,
            estimated_upload_epoch: None,
        };
        let json = serde_json::to_string(&post).unwrap();
        assert!(!json.contains("activity_permalink"));
        assert!(!json.contains("estimated_upload_epoch"));
    }

    #[test]
    fn test_optional_fields_present_when_set() {
        let post = Post {
            index: 3,
            date: "2d".to_string(),
            text: "body".to_string(),
            reactions: "41".to_string(),
            comments: "5 comments".to_string(),
            reposts: "2 reposts".to_string(),
            activity_permalink: Some("https://example.com/feed/update/urn:li:activity:1".to_string()),
            estimated_upload_epoch: Some(29434.528),
        };
        let json = serde_json::to_string(&post).unwrap();
        assert!(json.contains("activity_permalink"));
        assert!(json.contains("estimated_upload_epoch"));

        // Roundtrip
        let parsed: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, post);
    }
}
