use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{EstuaryError, Result};
use crate::config::Config;
use crate::domain::Category;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::pipeline::CategoryBuilder;
use crate::source::{FeedAdapter, SearchAdapter, SourceAdapter, Sources};
use crate::store::JsonFileWriter;

pub struct AppContext {
    pub config: Arc<Config>,
    pub categories: Vec<Category>,
    pub builder: CategoryBuilder,
    pub writer: JsonFileWriter,
}

impl AppContext {
    /// Wire the real HTTP stack, reading the API key from the environment.
    pub fn new(config: Config, output_dir: Option<PathBuf>) -> Result<Self> {
        let api_key = std::env::var(&config.provider.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::with_options(
            config.provider.timeout(),
            &config.provider.user_agent,
        )?);

        Self::with_fetcher(config, fetcher, api_key, output_dir)
    }

    /// Everything is validated here, before any request goes out: patterns,
    /// the reference zone and, when a search query is configured, the key.
    pub fn with_fetcher(
        config: Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        api_key: Option<String>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let categories = config.categories()?;
        let zone = config.pipeline.zone()?;

        let needs_key = categories.iter().any(Category::has_search_queries);
        let search = match api_key {
            Some(key) => Some(
                SearchAdapter::new(fetcher.clone(), &config.provider.search_url, &key)
                    .with_locale(
                        &config.provider.region_code,
                        &config.provider.relevance_language,
                    ),
            ),
            None if needs_key => {
                return Err(EstuaryError::MissingCredential(
                    config.provider.api_key_env.clone(),
                ))
            }
            None => None,
        };

        let feed = FeedAdapter::new(fetcher, &config.provider.feed_url);
        let sources: Arc<dyn SourceAdapter> = Arc::new(Sources::new(search, feed));

        let builder =
            CategoryBuilder::new(sources, zone).with_concurrency(config.pipeline.concurrency);
        let writer = JsonFileWriter::new(output_dir.unwrap_or_else(|| config.output.dir.clone()));

        Ok(Self {
            config: Arc::new(config),
            categories,
            builder,
            writer,
        })
    }

    /// Categories to build: all of them, or the named ones in config order.
    pub fn select(&self, names: &[String]) -> Result<Vec<Category>> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.categories.iter().any(|c| &c.name == *name))
        {
            return Err(EstuaryError::CategoryNotFound(unknown.clone()));
        }

        Ok(self
            .categories
            .iter()
            .filter(|c| names.is_empty() || names.contains(&c.name))
            .cloned()
            .collect())
    }
}
