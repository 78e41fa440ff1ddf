use std::any::Any;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use super::{CrawlState, DataProvider, feed_source};
use crate::error::DataError;
use crate::filter::FiltersManager;
use crate::io::DataSource;
use crate::loader::DataLoader;

/// Provider walking a directory tree.
///
/// Entries are visited in file name order, sub-directories included.
#[derive(Debug, Clone)]
pub struct DirectoryCrawler {
    id: String,
    root: PathBuf,
}

impl DirectoryCrawler {
    /// Create a crawler for an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, DataError> {
        let root = root.into();
        if !root.exists() {
            return Err(DataError::MissingRoot(root));
        }
        if !root.is_dir() {
            return Err(DataError::NotADirectory(root));
        }
        Ok(Self {
            id: root.display().to_string(),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn crawl(
        &self,
        directory: &Path,
        supported: &Regex,
        loader: &mut dyn DataLoader,
        filters: &FiltersManager,
        state: &mut CrawlState,
    ) -> Result<(), DataError> {
        let mut entries = fs::read_dir(directory)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();

        for path in entries {
            if state.is_done(loader) {
                return Ok(());
            }

            if path.is_dir() {
                self.crawl(&path, supported, loader, filters, state)?;
                continue;
            }

            #[cfg(feature = "archives")]
            if path
                .file_name()
                .is_some_and(|n| super::is_archive_name(&n.to_string_lossy()))
            {
                super::ZipJarCrawler::from_path(&path)?
                    .crawl(supported, loader, filters, state)?;
                continue;
            }

            let display_name = path.display().to_string();
            feed_source(
                DataSource::from_path(&path),
                &display_name,
                supported,
                loader,
                filters,
                state,
            )?;
        }
        Ok(())
    }
}

impl DataProvider for DirectoryCrawler {
    fn id(&self) -> &str {
        &self.id
    }

    fn feed(
        &self,
        supported: &Regex,
        loader: &mut dyn DataLoader,
        filters: &FiltersManager,
    ) -> Result<bool, DataError> {
        if !self.root.exists() {
            return Err(DataError::MissingRoot(self.root.clone()));
        }
        let mut state = CrawlState::default();
        self.crawl(&self.root, supported, loader, filters, &mut state)?;
        Ok(state.loaded)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
