//! Predicate pipeline applied to every normalized item.
//!
//! Stages run in a fixed order (inclusion, exclusion, time window) and an
//! item survives only if every stage admits it.

pub mod window;

use regex::{Regex, RegexBuilder};

use crate::domain::{ContentItem, SourceQuery};

pub use window::{TimeWindow, DEFAULT_REFERENCE_ZONE};

/// Build a case-insensitive pattern, the way every title rule is matched.
pub fn title_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

pub trait ItemFilter: Send + Sync {
    fn name(&self) -> &'static str;
    fn admits(&self, item: &ContentItem) -> bool;
}

/// Per-query rule: title pattern and channel allow-list. When both are
/// configured, both must match.
#[derive(Debug, Clone, Default)]
pub struct Inclusion {
    title_pattern: Option<Regex>,
    channels: Vec<String>,
}

impl Inclusion {
    pub fn for_query(query: &SourceQuery) -> Self {
        Self {
            title_pattern: query.title_pattern.clone(),
            channels: query.channels.clone(),
        }
    }
}

impl ItemFilter for Inclusion {
    fn name(&self) -> &'static str {
        "inclusion"
    }

    fn admits(&self, item: &ContentItem) -> bool {
        let title_ok = self
            .title_pattern
            .as_ref()
            .is_none_or(|p| p.is_match(&item.title));

        let channel_ok = self.channels.is_empty() || {
            let channel = item.channel.to_lowercase();
            self.channels.iter().any(|allowed| channel.contains(allowed))
        };

        title_ok && channel_ok
    }
}

/// Per-category deny pattern over the title.
#[derive(Debug, Clone)]
pub struct Exclusion {
    pattern: Regex,
}

impl Exclusion {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl ItemFilter for Exclusion {
    fn name(&self) -> &'static str {
        "exclusion"
    }

    fn admits(&self, item: &ContentItem) -> bool {
        !self.pattern.is_match(&item.title)
    }
}

impl ItemFilter for TimeWindow {
    fn name(&self) -> &'static str {
        "time window"
    }

    /// Items without a publish time can't be shown to fall inside.
    fn admits(&self, item: &ContentItem) -> bool {
        item.published.is_some_and(|published| self.contains(published))
    }
}

#[derive(Default)]
pub struct FilterChain {
    stages: Vec<Box<dyn ItemFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chain for one source query of a category.
    pub fn for_query(
        query: &SourceQuery,
        exclusion: Option<&Regex>,
        window: Option<TimeWindow>,
    ) -> Self {
        let mut chain = Self::new().with(Inclusion::for_query(query));
        if let Some(pattern) = exclusion {
            chain = chain.with(Exclusion::new(pattern.clone()));
        }
        if let Some(window) = window {
            chain = chain.with(window);
        }
        chain
    }

    pub fn with<F: ItemFilter + 'static>(mut self, stage: F) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn admits(&self, item: &ContentItem) -> bool {
        match self.stages.iter().find(|stage| !stage.admits(item)) {
            Some(stage) => {
                tracing::trace!(id = %item.id, title = %item.title, stage = stage.name(), "item filtered");
                false
            }
            None => true,
        }
    }

    pub fn apply(&self, items: Vec<ContentItem>) -> Vec<ContentItem> {
        items.into_iter().filter(|item| self.admits(item)).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
