use serde::Deserialize;

use crate::config::ConfigError;
use crate::domain::{Category, SourceKind, SourceQuery, WindowRule, MAX_RESULTS_PER_CALL};
use crate::filter::title_pattern;

pub const DEFAULT_MAX_ITEMS: usize = 100;

/// Titles nobody wants in a listing: reactions, lyric uploads, tempo edits,
/// shorts, teasers and fan-made cuts.
pub const DEFAULT_EXCLUDE_PATTERN: &str =
    "reaction|lyric|lyrics|sped|slowed|nightcore|fan|remix|shorts|edit|teaser";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    pub name: String,

    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Default title pattern for sources without their own
    #[serde(default)]
    pub include: Option<String>,

    /// Deny pattern over titles; an empty string disables it
    #[serde(default = "default_exclude")]
    pub exclude: String,

    #[serde(default)]
    pub window: Option<WindowRule>,

    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub search: Option<String>,
    pub channel: Option<String>,
    pub feed_query: Option<String>,
    pub title_pattern: Option<String>,
    pub channels: Vec<String>,
    pub max_results: Option<usize>,
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

fn default_exclude() -> String {
    DEFAULT_EXCLUDE_PATTERN.to_string()
}

impl CategoryConfig {
    pub fn compile(&self) -> Result<Category, ConfigError> {
        let name = self.name.trim();
        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_name {
            return Err(ConfigError::InvalidCategoryName(self.name.clone()));
        }

        let exclusion = match self.exclude.trim() {
            "" => None,
            pattern => Some(self.pattern(pattern)?),
        };

        let queries = self
            .sources
            .iter()
            .map(|source| self.compile_source(source))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Category {
            name: name.to_string(),
            max_items: self.max_items,
            exclusion,
            window: self.window,
            queries,
        })
    }

    fn compile_source(&self, source: &SourceConfig) -> Result<SourceQuery, ConfigError> {
        let kind = source.kind().map_err(|reason| ConfigError::InvalidSource {
            category: self.name.clone(),
            reason,
        })?;

        let mut query = SourceQuery::new(kind)
            .with_channels(&source.channels)
            .with_max_results(source.max_results.unwrap_or(MAX_RESULTS_PER_CALL));

        let pattern = source
            .title_pattern
            .as_deref()
            .or(self.include.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if let Some(pattern) = pattern {
            query = query.with_title_pattern(self.pattern(pattern)?);
        }

        Ok(query)
    }

    fn pattern(&self, pattern: &str) -> Result<regex::Regex, ConfigError> {
        title_pattern(pattern).map_err(|source| ConfigError::InvalidPattern {
            category: self.name.clone(),
            pattern: pattern.to_string(),
            source,
        })
    }
}

impl SourceConfig {
    fn kind(&self) -> Result<SourceKind, String> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        match (
            non_blank(&self.search),
            non_blank(&self.channel),
            non_blank(&self.feed_query),
        ) {
            (Some(query), None, None) => Ok(SourceKind::Search { query }),
            (None, Some(channel_id), None) => Ok(SourceKind::Channel { channel_id }),
            (None, None, Some(query)) => Ok(SourceKind::FeedQuery { query }),
            (None, None, None) => {
                Err("set one of `search`, `channel` or `feed_query`".to_string())
            }
            _ => Err("set only one of `search`, `channel` or `feed_query`".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(sources: Vec<SourceConfig>) -> CategoryConfig {
        CategoryConfig {
            name: "football".into(),
            max_items: DEFAULT_MAX_ITEMS,
            include: Some("highlight|goal".into()),
            exclude: default_exclude(),
            window: None,
            sources,
        }
    }

    fn search(text: &str) -> SourceConfig {
        SourceConfig {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_category_include_is_inherited() {
        let compiled = category(vec![search("Premier League highlights")])
            .compile()
            .unwrap();
        let pattern = compiled.queries[0].title_pattern.as_ref().unwrap();
        assert!(pattern.is_match("ALL THE GOALS"));
    }

    #[test]
    fn test_source_pattern_overrides_include() {
        let source = SourceConfig {
            title_pattern: Some("trailer".into()),
            ..search("q")
        };
        let compiled = category(vec![source]).compile().unwrap();
        let pattern = compiled.queries[0].title_pattern.as_ref().unwrap();
        assert!(pattern.is_match("Official Trailer"));
        assert!(!pattern.is_match("Goals"));
    }

    #[test]
    fn test_default_exclusion_pattern() {
        let compiled = category(vec![]).compile().unwrap();
        let exclusion = compiled.exclusion.unwrap();
        for title in ["Fan REACTION", "Song (Lyrics)", "sped up", "#Shorts", "Teaser"] {
            assert!(exclusion.is_match(title), "{title} should be excluded");
        }
        assert!(!exclusion.is_match("Arsenal 2-1 Spurs | Highlights"));
    }

    #[test]
    fn test_source_needs_exactly_one_kind() {
        let none = SourceConfig::default();
        assert!(matches!(
            category(vec![none]).compile(),
            Err(ConfigError::InvalidSource { .. })
        ));

        let both = SourceConfig {
            channel: Some("UC1".into()),
            ..search("q")
        };
        assert!(matches!(
            category(vec![both]).compile(),
            Err(ConfigError::InvalidSource { .. })
        ));
    }

    #[test]
    fn test_invalid_regex_is_a_config_error() {
        let mut config = category(vec![search("q")]);
        config.include = Some("(unclosed".into());
        assert!(matches!(
            config.compile(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_category_name_must_be_a_file_stem() {
        let mut config = category(vec![]);
        config.name = "../escape".into();
        assert!(matches!(
            config.compile(),
            Err(ConfigError::InvalidCategoryName(_))
        ));
    }
}
