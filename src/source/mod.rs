//! Source adapters: one outbound call per [`SourceQuery`].
//!
//! Adapters never fail past their boundary. Transport errors, bad statuses,
//! timeouts and undecodable bodies all come back as
//! [`SourceOutcome::Failed`], which the pipeline treats as "no candidates"
//! while still reporting it.

pub mod feed;
pub mod search;

use async_trait::async_trait;

use crate::domain::{RawCandidate, SourceKind, SourceQuery};

pub use feed::FeedAdapter;
pub use search::SearchAdapter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// The call succeeded; the list may legitimately be empty.
    Fetched(Vec<RawCandidate>),
    /// The call failed and contributed nothing.
    Failed(String),
}

impl SourceOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SourceOutcome::Failed(_))
    }

    pub fn into_candidates(self) -> Vec<RawCandidate> {
        match self {
            SourceOutcome::Fetched(candidates) => candidates,
            SourceOutcome::Failed(_) => Vec::new(),
        }
    }
}

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch_candidates(&self, query: &SourceQuery) -> SourceOutcome;
}

/// Routes each query to the adapter for its kind.
pub struct Sources {
    search: Option<SearchAdapter>,
    feed: FeedAdapter,
}

impl Sources {
    /// `search` is `None` when no credential was supplied; search queries
    /// then fail softly instead of hitting the API unauthenticated.
    pub fn new(search: Option<SearchAdapter>, feed: FeedAdapter) -> Self {
        Self { search, feed }
    }
}

#[async_trait]
impl SourceAdapter for Sources {
    async fn fetch_candidates(&self, query: &SourceQuery) -> SourceOutcome {
        match (&query.kind, &self.search) {
            (SourceKind::Search { .. }, Some(search)) => search.fetch_candidates(query).await,
            (SourceKind::Search { .. }, None) => {
                tracing::warn!(source = %query.label(), "no search credential configured");
                SourceOutcome::Failed("no search credential configured".into())
            }
            (SourceKind::Channel { .. } | SourceKind::FeedQuery { .. }, _) => {
                self.feed.fetch_candidates(query).await
            }
        }
    }
}
