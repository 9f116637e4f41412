use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContentItem;

/// One category's finished listing.
///
/// Built fresh on every run and handed to the artifact writer whole; it is
/// never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedArtifact {
    pub category: String,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<ContentItem>,
}

impl FeedArtifact {
    pub fn new(category: &str, updated_at: DateTime<Utc>, items: Vec<ContentItem>) -> Self {
        Self {
            category: category.to_string(),
            updated_at,
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
