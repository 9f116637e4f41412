use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const EMBED_URL: &str = "https://www.youtube.com/embed/";

/// Video ids are plain `[A-Za-z0-9_-]` tokens; anything else would change
/// meaning once spliced into a watch or embed URL.
pub fn is_video_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A provider record before normalization.
///
/// Search results and feed entries both land here; `id` may be empty when
/// the provider gave us nothing usable, in which case the record never makes
/// it past the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidate {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub published: Option<String>,
}

/// The canonical output unit of a category build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub url: String,
    pub embed_url: String,
    pub published: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// Build an item from a resolved identifier.
    ///
    /// Returns `None` for a blank or non-token identifier so a partial
    /// record, or one whose URLs point elsewhere, can never be constructed.
    pub fn new(
        id: &str,
        title: &str,
        channel: &str,
        published: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        let id = id.trim();
        if !is_video_id(id) {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            title: title.trim().to_string(),
            channel: channel.trim().to_string(),
            url: Self::watch_url(id),
            embed_url: Self::embed_url(id),
            published,
        })
    }

    pub fn watch_url(id: &str) -> String {
        format!("{}{}", WATCH_URL, id)
    }

    pub fn embed_url(id: &str) -> String {
        format!("{}{}", EMBED_URL, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_urls_from_id() {
        let item = ContentItem::new("abc123", "Title", "Channel", None).unwrap();
        assert_eq!(item.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(item.embed_url, "https://www.youtube.com/embed/abc123");
    }

    #[test]
    fn test_new_trims_text_fields() {
        let item = ContentItem::new(" abc123 ", "  Title \n", "\tChannel ", None).unwrap();
        assert_eq!(item.id, "abc123");
        assert_eq!(item.title, "Title");
        assert_eq!(item.channel, "Channel");
    }

    #[test]
    fn test_new_rejects_blank_id() {
        assert!(ContentItem::new("", "Title", "Channel", None).is_none());
        assert!(ContentItem::new("   ", "Title", "Channel", None).is_none());
    }

    #[test]
    fn test_new_rejects_ids_that_would_rewrite_the_url() {
        assert!(ContentItem::new("abc&v=other#x", "Title", "", None).is_none());
        assert!(ContentItem::new("abc/../def", "Title", "", None).is_none());
        assert!(ContentItem::new("two words", "Title", "", None).is_none());
        assert!(ContentItem::new("dQw4w9WgXcQ", "Title", "", None).is_some());
        assert!(ContentItem::new("with-dash_and_underscore", "Title", "", None).is_some());
    }

    #[test]
    fn test_empty_channel_is_kept() {
        let item = ContentItem::new("abc123", "Title", "", None).unwrap();
        assert_eq!(item.channel, "");
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let item = ContentItem::new("abc123", "Title", "Channel", None).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["embedUrl"], "https://www.youtube.com/embed/abc123");
        assert!(json["published"].is_null());
    }
}
