use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::app::{EstuaryError, Result};
use crate::domain::{RawCandidate, SourceKind, SourceQuery};
use crate::fetcher::Fetcher;
use crate::normalizer::parse_entries;
use crate::source::{SourceAdapter, SourceOutcome};

pub const DEFAULT_FEED_URL: &str = "https://www.youtube.com/feeds/videos.xml";

/// Fetches a public Atom feed for a channel or a free-text query.
pub struct FeedAdapter {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    endpoint: String,
}

impl FeedAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, endpoint: &str) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.to_string(),
        }
    }

    pub fn request_url(&self, kind: &SourceKind) -> Result<Url> {
        let url = match kind {
            SourceKind::Channel { channel_id } => {
                Url::parse_with_params(&self.endpoint, &[("channel_id", channel_id)])?
            }
            SourceKind::FeedQuery { query } => {
                Url::parse_with_params(&self.endpoint, &[("search_query", query)])?
            }
            SourceKind::Search { .. } => {
                return Err(EstuaryError::Other(format!(
                    "{} needs the search adapter, not a feed",
                    kind
                )))
            }
        };
        Ok(url)
    }

    async fn fetch_entries(&self, query: &SourceQuery) -> Result<Vec<RawCandidate>> {
        let url = self.request_url(&query.kind)?;
        let body = self.fetcher.fetch(url.as_str()).await?;

        let mut candidates = parse_entries(&body)?;
        candidates.truncate(query.max_results);
        Ok(candidates)
    }
}

#[async_trait]
impl SourceAdapter for FeedAdapter {
    async fn fetch_candidates(&self, query: &SourceQuery) -> SourceOutcome {
        match self.fetch_entries(query).await {
            Ok(candidates) => SourceOutcome::Fetched(candidates),
            Err(e) => {
                tracing::warn!(source = %query.label(), error = %e, "feed request failed");
                SourceOutcome::Failed(e.to_string())
            }
        }
    }
}
