use std::sync::Arc;

use async_trait::async_trait;
use html_escape::decode_html_entities;
use serde::Deserialize;
use url::Url;

use crate::app::{EstuaryError, Result};
use crate::domain::{RawCandidate, SourceKind, SourceQuery};
use crate::fetcher::Fetcher;
use crate::source::{SourceAdapter, SourceOutcome};

pub const DEFAULT_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
pub const DEFAULT_REGION_CODE: &str = "GB";
pub const DEFAULT_RELEVANCE_LANGUAGE: &str = "en";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<SearchResult>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResult {
    id: ResultId,
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ResultId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    published_at: Option<String>,
}

/// Keyed search against the video search API.
pub struct SearchAdapter {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    endpoint: String,
    api_key: String,
    region_code: String,
    relevance_language: String,
}

impl SearchAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, endpoint: &str, api_key: &str) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            region_code: DEFAULT_REGION_CODE.to_string(),
            relevance_language: DEFAULT_RELEVANCE_LANGUAGE.to_string(),
        }
    }

    pub fn with_locale(mut self, region_code: &str, relevance_language: &str) -> Self {
        self.region_code = region_code.to_string();
        self.relevance_language = relevance_language.to_string();
        self
    }

    pub fn request_url(&self, query: &str, max_results: usize) -> Result<Url> {
        let max_results = max_results.to_string();
        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("q", query),
                ("key", self.api_key.as_str()),
                ("regionCode", self.region_code.as_str()),
                ("relevanceLanguage", self.relevance_language.as_str()),
            ],
        )?;
        Ok(url)
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawCandidate>> {
        let url = self.request_url(query, max_results)?;
        let body = self.fetcher.fetch(url.as_str()).await?;
        parse_search_response(&body)
    }
}

#[async_trait]
impl SourceAdapter for SearchAdapter {
    async fn fetch_candidates(&self, query: &SourceQuery) -> SourceOutcome {
        let SourceKind::Search { query: text } = &query.kind else {
            return SourceOutcome::Failed(format!("{} is not a search query", query.label()));
        };

        match self.search(text, query.max_results).await {
            Ok(candidates) => SourceOutcome::Fetched(candidates),
            Err(e) => {
                tracing::warn!(source = %query.label(), error = %e, "search request failed");
                SourceOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Decode a search response body. A body without an `items` array is an
/// empty result, not an error.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<RawCandidate>> {
    let response: SearchResponse = serde_json::from_slice(body).map_err(EstuaryError::Decode)?;

    let candidates = response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|result| RawCandidate {
            id: result.id.video_id.unwrap_or_default(),
            title: decode_html_entities(&result.snippet.title).to_string(),
            channel: decode_html_entities(&result.snippet.channel_title).to_string(),
            published: result.snippet.published_at,
        })
        .collect();

    Ok(candidates)
}
