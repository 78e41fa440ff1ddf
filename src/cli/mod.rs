//! CLI integration helpers for astrodata.
//!
//! This module provides utilities to turn command line arguments into a
//! [`DataProvidersBuilder`] and a loader listing what a feed finds.
//!
//! # Example
//!
//! ```rust,ignore
//! use astrodata::cli::{ListingLoader, ScanArgs};
//!
//! let args = ScanArgs::new()
//!     .with_path("/data/orekit-data")
//!     .with_pattern(r".*\.history");
//!
//! let mut manager = args.to_builder().build()?;
//! let mut listing = ListingLoader::new();
//! manager.feed(args.pattern(), &mut listing)?;
//! for (name, size) in listing.entries() {
//!     println!("{name}\t{size}");
//! }
//! ```

use std::io::{self, Read};

use crate::builder::DataProvidersBuilder;
use crate::error::{ErrorPolicy, LoaderError};
use crate::loader::{DataLoader, LoadControl};

#[cfg(feature = "sarge")]
mod sarge;

/// Pattern matching every resource.
pub const MATCH_ALL: &str = ".*";

/// Search locations given on the command line.
///
/// Each element may itself be a platform search path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathList(pub Vec<String>);

impl PathList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Arguments of a scan over some data roots.
#[derive(Debug, Clone, Default)]
pub struct ScanArgs {
    /// Directories, archives or search paths to crawl
    pub paths: PathList,
    /// Supported-names pattern; every resource when absent
    pub pattern: Option<String>,
    /// Keep crawling after a failing provider
    pub accumulate: bool,
}

impl ScanArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.paths.0.push(path.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_accumulate(mut self) -> Self {
        self.accumulate = true;
        self
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or(MATCH_ALL)
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        if self.accumulate {
            ErrorPolicy::Accumulate
        } else {
            ErrorPolicy::FastFail
        }
    }

    /// Builder crawling every path, falling back to `ASTRODATA_PATH`.
    pub fn to_builder(&self) -> DataProvidersBuilder {
        let builder = if self.paths.is_empty() {
            DataProvidersBuilder::from_env()
        } else {
            self.paths
                .iter()
                .fold(DataProvidersBuilder::new(), |b, p| b.add_search_path(p))
        };
        builder.with_mode(self.error_policy())
    }
}

/// Loader recording the name and decoded size of every resource.
#[derive(Debug, Clone, Default)]
pub struct ListingLoader {
    entries: Vec<(String, u64)>,
    limit: Option<usize>,
}

impl ListingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after `limit` resources.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DataLoader for ListingLoader {
    fn still_accepts_data(&self) -> bool {
        self.limit.is_none_or(|limit| self.entries.len() < limit)
    }

    fn load_data(&mut self, input: &mut dyn Read, name: &str) -> Result<LoadControl, LoaderError> {
        let size = io::copy(input, &mut io::sink())?;
        self.entries.push((name.to_string(), size));
        if self.still_accepts_data() {
            Ok(LoadControl::Continue)
        } else {
            Ok(LoadControl::Stop)
        }
    }
}
