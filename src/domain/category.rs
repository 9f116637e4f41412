use regex::Regex;
use serde::{Deserialize, Serialize};

use super::SourceQuery;

/// Optional recency rule attached to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowRule {
    /// The whole previous calendar day in the reference zone.
    PreviousDay,
}

/// A compiled category definition, ready to be built.
#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub max_items: usize,
    pub exclusion: Option<Regex>,
    pub window: Option<WindowRule>,
    pub queries: Vec<SourceQuery>,
}

impl Category {
    pub fn has_search_queries(&self) -> bool {
        self.queries
            .iter()
            .any(|q| matches!(q.kind, super::SourceKind::Search { .. }))
    }
}
