//! Builder for creating DataProvidersManager instances.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{DataConfig, ProviderSpec, split_search_path};
use crate::error::{DataError, ErrorPolicy, FeedError, ProviderError};
use crate::filter::DataFilter;
use crate::io::DEFAULT_NETWORK_TIMEOUT;
use crate::manager::DataProvidersManager;
use crate::provider::{DataProvider, NetworkCrawler};

#[derive(Debug)]
enum Entry {
    Path(PathBuf),
    Urls(Vec<String>),
    Provider(Arc<dyn DataProvider>),
}

/// Assemble a [`DataProvidersManager`] from paths, URLs and providers.
///
/// Providers are registered in the order they were added; consecutive URLs
/// share a single network provider.
#[derive(Debug)]
pub struct DataProvidersBuilder {
    entries: Vec<Entry>,
    filters: Vec<Arc<dyn DataFilter>>,
    default_filters: bool,
    error_policy: ErrorPolicy,
    network_timeout: Duration,
}

impl DataProvidersBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            filters: Vec::new(),
            default_filters: true,
            error_policy: ErrorPolicy::FastFail,
            network_timeout: DEFAULT_NETWORK_TIMEOUT,
        }
    }

    /// Add a directory or archive.
    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.push(Entry::Path(path.into()));
        self
    }

    /// Add every segment of a platform search path.
    pub fn add_search_path(mut self, search_path: &str) -> Self {
        self.entries
            .extend(split_search_path(search_path).into_iter().map(Entry::Path));
        self
    }

    pub fn add_url(mut self, url: impl Into<String>) -> Self {
        match self.entries.last_mut() {
            Some(Entry::Urls(urls)) => urls.push(url.into()),
            _ => self.entries.push(Entry::Urls(vec![url.into()])),
        }
        self
    }

    pub fn add_provider(mut self, provider: Arc<dyn DataProvider>) -> Self {
        self.entries.push(Entry::Provider(provider));
        self
    }

    /// Install a filter after the default ones.
    pub fn with_filter(mut self, filter: Arc<dyn DataFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn without_default_filters(mut self) -> Self {
        self.default_filters = false;
        self
    }

    pub fn with_mode(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_network_timeout(mut self, timeout: Duration) -> Self {
        self.network_timeout = timeout;
        self
    }

    /// Start from a configuration.
    ///
    /// The search path comes first, then explicit paths, then URLs.
    pub fn from_config(config: DataConfig) -> Result<Self, FeedError> {
        let as_feed_error = |e: DataError| FeedError::single(ProviderError::new("config", e));

        let mut builder = DataProvidersBuilder::new()
            .with_mode(config.parsed_error_policy().map_err(as_feed_error)?);

        if let Some(names) = config.parsed_filters().map_err(as_feed_error)? {
            builder = builder.without_default_filters();
            for name in names {
                builder = builder.with_filter(name.build());
            }
        }

        if let Some(timeout) = config.network_timeout() {
            builder = builder.with_network_timeout(timeout);
        }

        if let Some(search_path) = config.search_path.as_deref() {
            builder = builder.add_search_path(search_path);
        }
        for path in config.paths {
            builder = builder.add_path(path);
        }
        for url in config.urls {
            builder = builder.add_url(url);
        }

        Ok(builder)
    }

    /// Start from the search path found in `ASTRODATA_PATH`, if any.
    pub fn from_env() -> Self {
        match DataConfig::from_env().search_path {
            Some(search_path) => DataProvidersBuilder::new().add_search_path(&search_path),
            None => DataProvidersBuilder::new(),
        }
    }

    pub fn build(self) -> Result<DataProvidersManager, FeedError> {
        let mut manager = DataProvidersManager::new();
        manager.set_error_policy(self.error_policy);

        if self.default_filters {
            manager.filters_mut().add_default_filters();
        }
        for filter in self.filters {
            manager.filters_mut().add_filter(filter);
        }

        let mut errors = Vec::new();
        for entry in self.entries {
            match resolve_entry(entry, self.network_timeout) {
                Ok(provider) => manager.add_provider(provider),
                Err(e) => {
                    errors.push(e);
                    if matches!(self.error_policy, ErrorPolicy::FastFail) {
                        return Err(FeedError { errors });
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(manager)
        } else {
            Err(FeedError { errors })
        }
    }
}

fn resolve_entry(entry: Entry, timeout: Duration) -> Result<Arc<dyn DataProvider>, ProviderError> {
    match entry {
        Entry::Path(path) => {
            let raw = path.display().to_string();
            ProviderSpec::classify(&path)
                .and_then(ProviderSpec::into_provider)
                .map_err(|e| ProviderError::new(raw, e))
        }
        Entry::Urls(urls) => {
            let raw = urls.join(",");
            NetworkCrawler::from_strs(&urls)
                .map(|crawler| Arc::new(crawler.with_timeout(timeout)) as Arc<dyn DataProvider>)
                .map_err(|e| ProviderError::new(raw, e))
        }
        Entry::Provider(provider) => Ok(provider),
    }
}

impl Default for DataProvidersBuilder {
    fn default() -> Self {
        DataProvidersBuilder::new()
    }
}
