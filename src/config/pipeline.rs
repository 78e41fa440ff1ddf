//! Serializable data configuration.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DataError, ErrorPolicy};
use crate::filter::{DataFilter, UnixCompressFilter};

/// Environment variable holding the default search path.
pub const DATA_PATH_ENV: &str = "ASTRODATA_PATH";

/// Description of where data lives and how it is decoded.
///
/// ```yaml
/// search_path: /data/iers:/data/archives/eop.zip
/// paths: [./local-data]
/// urls: [https://example.org/finals2000A.daily]
/// error_policy: accumulate
/// filters: [gzip, unix-compress]
/// network_timeout_secs: 30
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DataConfig {
    /// Platform search path (`:` separated on Unix, `;` on Windows)
    #[serde(default)]
    pub search_path: Option<String>,
    /// Directories and archives, in order
    #[serde(default)]
    pub paths: Vec<String>,
    /// URLs read by a single network provider
    #[serde(default)]
    pub urls: Vec<String>,
    /// Error policy: "fast_fail" or "accumulate"
    #[serde(default)]
    pub error_policy: Option<String>,
    /// Filters to install; the defaults when absent
    #[serde(default)]
    pub filters: Option<Vec<String>>,
    /// Timeout of remote fetches
    #[serde(default)]
    pub network_timeout_secs: Option<u64>,
}

impl DataConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration holding the search path found in `ASTRODATA_PATH`.
    pub fn from_env() -> Self {
        Self::from_env_var(DATA_PATH_ENV)
    }

    /// Configuration holding the search path found in an environment variable.
    pub fn from_env_var(name: &str) -> Self {
        Self {
            search_path: std::env::var(name).ok().filter(|s| !s.is_empty()),
            ..Self::default()
        }
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    #[cfg(feature = "json")]
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_search_path(mut self, search_path: impl Into<String>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn add_path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn add_url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    pub fn with_error_policy(mut self, policy: impl Into<String>) -> Self {
        self.error_policy = Some(policy.into());
        self
    }

    pub fn with_filters(mut self, filters: Vec<String>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Parsed error policy, the default when absent.
    pub fn parsed_error_policy(&self) -> Result<ErrorPolicy, DataError> {
        match self.error_policy.as_deref() {
            None => Ok(ErrorPolicy::default()),
            Some(raw) => raw.parse(),
        }
    }

    /// Parsed filter names, `None` when the defaults apply.
    pub fn parsed_filters(&self) -> Result<Option<Vec<FilterName>>, DataError> {
        self.filters
            .as_ref()
            .map(|names| names.iter().map(|n| n.parse()).collect())
            .transpose()
    }

    pub fn network_timeout(&self) -> Option<Duration> {
        self.network_timeout_secs.map(Duration::from_secs)
    }
}

/// Filters that can be named in a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterName {
    #[cfg(feature = "gzip")]
    Gzip,
    UnixCompress,
}

impl FromStr for FilterName {
    type Err = DataError;

    /// Parse a filter name.
    ///
    /// `gzip` is only known when the `gzip` feature is enabled.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            #[cfg(feature = "gzip")]
            "gzip" | "gz" => Ok(FilterName::Gzip),
            "unix-compress" | "unix_compress" | "compress" | "z" => Ok(FilterName::UnixCompress),
            other => Err(DataError::InvalidConfig(format!("unknown filter '{other}'"))),
        }
    }
}

impl FilterName {
    pub fn build(self) -> Arc<dyn DataFilter> {
        match self {
            #[cfg(feature = "gzip")]
            FilterName::Gzip => Arc::new(crate::filter::GzipFilter),
            FilterName::UnixCompress => Arc::new(UnixCompressFilter),
        }
    }
}
