//! Search path segments and the providers they turn into.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::DataError;
use crate::provider::{DataProvider, DirectoryCrawler};

/// Backend a search path segment designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// A directory tree
    Directory,
    /// A zip or jar archive
    Archive,
}

/// One classified search path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    /// Segment as configured
    pub path: PathBuf,
    pub kind: ProviderKind,
}

impl ProviderSpec {
    /// Classify an existing path.
    ///
    /// Directories and archives are accepted; a missing path is a
    /// `MissingRoot` error and any other file is `NotADirectory`.
    pub fn classify(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::MissingRoot(path.to_path_buf()));
        }
        if path.is_dir() {
            return Ok(Self {
                path: path.to_path_buf(),
                kind: ProviderKind::Directory,
            });
        }

        #[cfg(feature = "archives")]
        if path
            .file_name()
            .is_some_and(|n| crate::provider::is_archive_name(&n.to_string_lossy()))
        {
            return Ok(Self {
                path: path.to_path_buf(),
                kind: ProviderKind::Archive,
            });
        }

        Err(DataError::NotADirectory(path.to_path_buf()))
    }

    /// Build the provider for this segment.
    pub fn into_provider(self) -> Result<Arc<dyn DataProvider>, DataError> {
        match self.kind {
            ProviderKind::Directory => Ok(Arc::new(DirectoryCrawler::new(self.path)?)),
            #[cfg(feature = "archives")]
            ProviderKind::Archive => Ok(Arc::new(crate::provider::ZipJarCrawler::from_path(
                &self.path,
            )?)),
            #[cfg(not(feature = "archives"))]
            ProviderKind::Archive => Err(DataError::NotADirectory(self.path)),
        }
    }
}

/// Split a search path on the platform separator.
///
/// Empty segments are dropped, so repeated separators are harmless.
pub fn split_search_path(search_path: &str) -> Vec<PathBuf> {
    env::split_paths(search_path)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}
