//! Filters applied to data sources before they reach a loader.
//!
//! A filter inspects a [`DataSource`] and, when it applies, returns a new
//! source with a stripped name whose stream is transformed lazily.

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::DataError;
use crate::io::DataSource;

#[cfg(feature = "gzip")]
mod gzip;
mod unix_compress;

#[cfg(feature = "gzip")]
pub use gzip::GzipFilter;
pub use unix_compress::{UnixCompressFilter, UnixCompressReader};

/// Transformation of a data source.
pub trait DataFilter: Send + Sync + Debug {
    /// Short identifier used in logs.
    fn id(&self) -> &str;

    /// Filter a source.
    ///
    /// Returns `Ok(None)` when the filter does not apply to `original`.
    fn filter(&self, original: &DataSource) -> Result<Option<DataSource>, DataError>;
}

/// Ordered list of filters.
#[derive(Debug, Clone, Default)]
pub struct FiltersManager {
    filters: Vec<Arc<dyn DataFilter>>,
}

impl FiltersManager {
    /// Create a manager without any filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager holding the default decompression filters.
    pub fn with_default_filters() -> Self {
        let mut manager = Self::new();
        manager.add_default_filters();
        manager
    }

    /// Add the decompression filters enabled in this build.
    pub fn add_default_filters(&mut self) {
        #[cfg(feature = "gzip")]
        self.add_filter(Arc::new(GzipFilter));
        self.add_filter(Arc::new(UnixCompressFilter));
    }

    pub fn add_filter(&mut self, filter: Arc<dyn DataFilter>) {
        self.filters.push(filter);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn filters(&self) -> &[Arc<dyn DataFilter>] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply every relevant filter to a source.
    ///
    /// The whole list is applied again after each successful filter, so
    /// stacked layers such as `data.gz.Z` are all removed.
    pub fn apply_relevant_filters(&self, original: DataSource) -> Result<DataSource, DataError> {
        let mut current = original;
        loop {
            let mut applied = false;
            for filter in &self.filters {
                if let Some(filtered) = filter.filter(&current)? {
                    log::trace!(
                        "filter {} turned {} into {}",
                        filter.id(),
                        current.name(),
                        filtered.name()
                    );
                    current = filtered;
                    applied = true;
                }
            }
            if !applied {
                return Ok(current);
            }
        }
    }
}
