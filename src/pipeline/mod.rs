//! Category builds.
//!
//! ```text
//! SourceQuery → SourceAdapter → Normalizer → FilterChain ─┐
//! SourceQuery → SourceAdapter → Normalizer → FilterChain ─┼→ dedup → cap → FeedArtifact
//! SourceQuery → SourceAdapter → Normalizer → FilterChain ─┘
//! ```
//!
//! Source calls for a category run with bounded concurrency, but their
//! results are merged in configured query order, never completion order.

pub mod assemble;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use futures::future::join_all;
use futures::stream::{self, StreamExt};

use crate::domain::{Category, FeedArtifact};
use crate::filter::FilterChain;
use crate::normalizer::Normalizer;
use crate::source::{SourceAdapter, SourceOutcome};

pub use assemble::{assemble, dedup};

pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Fetched { candidates: usize, kept: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub label: String,
    pub status: SourceStatus,
}

impl SourceReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, SourceStatus::Failed { .. })
    }
}

/// An artifact plus what each of its sources contributed.
#[derive(Debug, Clone)]
pub struct CategoryBuild {
    pub artifact: FeedArtifact,
    pub sources: Vec<SourceReport>,
}

impl CategoryBuild {
    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.is_failure()).count()
    }
}

pub struct CategoryBuilder {
    sources: Arc<dyn SourceAdapter>,
    normalizer: Normalizer,
    zone: Tz,
    concurrency: usize,
}

impl CategoryBuilder {
    pub fn new(sources: Arc<dyn SourceAdapter>, zone: Tz) -> Self {
        Self {
            sources,
            normalizer: Normalizer::new(),
            zone,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Build every category concurrently against the same build instant.
    /// Results come back in the order of `categories`.
    pub async fn build_all(
        &self,
        categories: &[Category],
        started_at: DateTime<Utc>,
    ) -> Vec<CategoryBuild> {
        join_all(
            categories
                .iter()
                .map(|category| self.build(category, started_at)),
        )
        .await
    }

    pub async fn build(&self, category: &Category, started_at: DateTime<Utc>) -> CategoryBuild {
        let window = category
            .window
            .map(|rule| rule.bounds(started_at, self.zone));

        if let Some(window) = window {
            tracing::debug!(
                category = %category.name,
                start = %window.start,
                end = %window.end,
                "applying time window"
            );
        }

        // `buffered` yields in input order, whatever order the calls finish in.
        let outcomes: Vec<SourceOutcome> = stream::iter(category.queries.iter())
            .map(|query| self.sources.fetch_candidates(query))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut reports = Vec::with_capacity(outcomes.len());
        let mut accepted = Vec::new();

        for (query, outcome) in category.queries.iter().zip(outcomes) {
            let label = query.label();

            let status = match outcome {
                SourceOutcome::Fetched(candidates) => {
                    let chain = FilterChain::for_query(query, category.exclusion.as_ref(), window);
                    let fetched = candidates.len();
                    let items: Vec<_> = candidates
                        .into_iter()
                        .filter_map(|raw| self.normalizer.normalize(raw))
                        .filter(|item| chain.admits(item))
                        .collect();

                    tracing::info!(
                        category = %category.name,
                        source = %label,
                        fetched,
                        kept = items.len(),
                        "source fetched"
                    );

                    let kept = items.len();
                    accepted.extend(items);
                    SourceStatus::Fetched {
                        candidates: fetched,
                        kept,
                    }
                }
                SourceOutcome::Failed(reason) => {
                    tracing::warn!(
                        category = %category.name,
                        source = %label,
                        %reason,
                        "source skipped"
                    );
                    SourceStatus::Failed { reason }
                }
            };

            reports.push(SourceReport { label, status });
        }

        let artifact = assemble(&category.name, started_at, accepted, category.max_items);

        tracing::info!(
            category = %category.name,
            items = artifact.len(),
            failed_sources = reports.iter().filter(|r| r.is_failure()).count(),
            "category built"
        );

        CategoryBuild {
            artifact,
            sources: reports,
        }
    }
}
