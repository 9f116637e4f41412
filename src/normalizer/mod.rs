pub mod entries;

use chrono::{DateTime, Utc};

use crate::domain::{ContentItem, RawCandidate};

pub use entries::parse_entries;

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Map a provider record onto a [`ContentItem`].
    ///
    /// Returns `None` when the record has no usable identifier (blank, or not
    /// a plain video-id token). A missing or
    /// malformed timestamp only clears `published`.
    pub fn normalize(&self, raw: RawCandidate) -> Option<ContentItem> {
        let published = raw.published.as_deref().and_then(parse_timestamp);
        let item = ContentItem::new(&raw.id, &raw.title, &raw.channel, published);

        if item.is_none() {
            tracing::debug!(title = %raw.title, "dropping candidate without a usable id");
        }

        item
    }
}

/// RFC 3339 first (search API, feeds), RFC 2822 as a fallback (RSS).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(id: &str, published: Option<&str>) -> RawCandidate {
        RawCandidate {
            id: id.into(),
            title: "  Arsenal v Spurs highlights ".into(),
            channel: " Match Channel ".into(),
            published: published.map(String::from),
        }
    }

    #[test]
    fn test_normalize_search_shaped_record() {
        let normalizer = Normalizer::new();
        let item = normalizer
            .normalize(raw("abc123", Some("2024-01-01T20:15:00Z")))
            .unwrap();

        assert_eq!(item.id, "abc123");
        assert_eq!(item.title, "Arsenal v Spurs highlights");
        assert_eq!(item.channel, "Match Channel");
        assert_eq!(item.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(item.embed_url, "https://www.youtube.com/embed/abc123");
        assert_eq!(
            item.published,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 20, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_offset_timestamps_are_converted_to_utc() {
        let normalizer = Normalizer::new();
        let item = normalizer
            .normalize(raw("abc123", Some("2024-06-01T21:00:00+01:00")))
            .unwrap();
        assert_eq!(
            item.published,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_rfc2822_timestamp() {
        assert_eq!(
            parse_timestamp("Mon, 01 Jan 2024 12:00:00 GMT"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_bad_timestamp_keeps_the_record() {
        let normalizer = Normalizer::new();
        let item = normalizer
            .normalize(raw("abc123", Some("yesterday-ish")))
            .unwrap();
        assert_eq!(item.published, None);

        let item = normalizer.normalize(raw("abc123", None)).unwrap();
        assert_eq!(item.published, None);
    }

    #[test]
    fn test_missing_id_drops_the_record() {
        let normalizer = Normalizer::new();
        assert!(normalizer.normalize(raw("", None)).is_none());
        assert!(normalizer.normalize(raw("  ", None)).is_none());
    }

    #[test]
    fn test_non_token_search_id_drops_the_record() {
        let normalizer = Normalizer::new();
        assert!(normalizer.normalize(raw("abc&v=other#x", None)).is_none());
        assert!(normalizer.normalize(raw("abc?t=10", None)).is_none());
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let normalizer = Normalizer::new();
        let a = normalizer.normalize(raw("abc123", Some("2024-01-01T20:15:00Z")));
        let b = normalizer.normalize(raw("abc123", Some("2024-01-01T20:15:00Z")));
        assert_eq!(a, b);
    }
}
