use std::fmt;

use regex::Regex;

/// Upper bound the search provider accepts for a single call.
pub const MAX_RESULTS_PER_CALL: usize = 50;

/// What a single upstream call asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Keyed search against the provider API.
    Search { query: String },
    /// Public upload feed of one channel.
    Channel { channel_id: String },
    /// Public feed of a free-text search.
    FeedQuery { query: String },
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Search { query } => write!(f, "search \"{}\"", query),
            SourceKind::Channel { channel_id } => write!(f, "channel {}", channel_id),
            SourceKind::FeedQuery { query } => write!(f, "feed \"{}\"", query),
        }
    }
}

/// One configured upstream request plus its inclusion rule.
#[derive(Debug, Clone)]
pub struct SourceQuery {
    pub kind: SourceKind,
    /// Case-insensitive title pattern; `None` admits every title.
    pub title_pattern: Option<Regex>,
    /// Lowercased channel allow-list; empty admits every channel.
    pub channels: Vec<String>,
    pub max_results: usize,
}

impl SourceQuery {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            title_pattern: None,
            channels: Vec::new(),
            max_results: MAX_RESULTS_PER_CALL,
        }
    }

    pub fn with_title_pattern(mut self, pattern: Regex) -> Self {
        self.title_pattern = Some(pattern);
        self
    }

    pub fn with_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.channels = channels
            .into_iter()
            .map(|c| c.as_ref().trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.clamp(1, MAX_RESULTS_PER_CALL);
        self
    }

    pub fn label(&self) -> String {
        self.kind.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_are_lowercased_and_blank_entries_dropped() {
        let query = SourceQuery::new(SourceKind::Channel {
            channel_id: "UC123".into(),
        })
        .with_channels(["Sky Sports", "  ", " BBC Sport "]);
        assert_eq!(query.channels, vec!["sky sports", "bbc sport"]);
    }

    #[test]
    fn test_max_results_is_clamped() {
        let kind = SourceKind::Search {
            query: "q".into(),
        };
        assert_eq!(SourceQuery::new(kind.clone()).with_max_results(0).max_results, 1);
        assert_eq!(SourceQuery::new(kind.clone()).with_max_results(500).max_results, 50);
        assert_eq!(SourceQuery::new(kind).with_max_results(20).max_results, 20);
    }

    #[test]
    fn test_label() {
        let query = SourceQuery::new(SourceKind::Search {
            query: "Premier League highlights".into(),
        });
        assert_eq!(query.label(), "search \"Premier League highlights\"");
    }
}
