//! Providers enumerating data sources from a backend.
//!
//! Every provider shares the same feeding rules:
//! - the supported-names pattern is matched against the filtered bare name
//!   of each entry, so anchored patterns work at any depth
//! - the loader is asked whether it still accepts data before each entry
//! - zip and jar archives met while crawling are crawled in turn
//! - loader failures are wrapped with the entry name, keeping the loader's
//!   message and error as source

use std::any::Any;
use std::fmt::Debug;
use std::io;

use regex::Regex;

use crate::error::{DataError, LoaderError};
use crate::filter::FiltersManager;
use crate::io::DataSource;
use crate::loader::{DataLoader, LoadControl};

mod directory;
mod network;
#[cfg(feature = "archives")]
mod zip_jar;
#[cfg(feature = "embedded")]
mod embedded;

pub use directory::DirectoryCrawler;
#[cfg(feature = "embedded")]
pub use embedded::EmbeddedCrawler;
pub use network::NetworkCrawler;
#[cfg(feature = "archives")]
pub use zip_jar::ZipJarCrawler;
#[cfg(all(test, feature = "archives"))]
pub(crate) use zip_jar::entry_capacity;

/// A configured backend able to feed loaders.
pub trait DataProvider: Send + Sync + Debug {
    /// Identifier used in logs and errors (root path, archive, URL list…).
    fn id(&self) -> &str;

    /// Feed `loader` with every entry whose filtered name matches `supported`.
    ///
    /// Returns true when at least one entry was loaded.
    fn feed(
        &self,
        supported: &Regex,
        loader: &mut dyn DataLoader,
        filters: &FiltersManager,
    ) -> Result<bool, DataError>;

    /// Access to the concrete provider type.
    fn as_any(&self) -> &dyn Any;
}

/// Progress of one crawl.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CrawlState {
    pub(crate) loaded: bool,
    pub(crate) stopped: bool,
}

impl CrawlState {
    pub(crate) fn is_done(&self, loader: &dyn DataLoader) -> bool {
        self.stopped || !loader.still_accepts_data()
    }
}

/// Whether a name designates a zip or jar archive.
pub(crate) fn is_archive_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".zip") || lower.ends_with(".jar")
}

/// Filter one source, and load it when its filtered name is supported.
pub(crate) fn feed_source(
    source: DataSource,
    display_name: &str,
    supported: &Regex,
    loader: &mut dyn DataLoader,
    filters: &FiltersManager,
    state: &mut CrawlState,
) -> Result<(), DataError> {
    let filtered = filters.apply_relevant_filters(source)?;
    if !supported.is_match(filtered.name()) {
        log::trace!("skipping {display_name}");
        return Ok(());
    }

    let Some(mut stream) = filtered.opener().open_stream_once()? else {
        log::trace!("nothing to read from {display_name}");
        return Ok(());
    };

    log::debug!("loading {display_name}");
    match loader.load_data(&mut *stream, filtered.name()) {
        Ok(control) => {
            state.loaded = true;
            state.stopped = control == LoadControl::Stop;
            Ok(())
        }
        Err(error) => Err(loader_failure(display_name, error)),
    }
}

/// Wrap a loader error, recovering crate errors that travelled through it.
fn loader_failure(display_name: &str, error: LoaderError) -> DataError {
    let error = match error.downcast::<DataError>() {
        Ok(data_error) => return *data_error,
        Err(other) => other,
    };
    match error.downcast::<io::Error>() {
        Ok(io_error)
            if io_error
                .get_ref()
                .is_some_and(|inner| inner.is::<DataError>()) =>
        {
            DataError::from(*io_error)
        }
        Ok(io_error) => DataError::Loader {
            name: display_name.to_string(),
            source: io_error,
        },
        Err(source) => DataError::Loader {
            name: display_name.to_string(),
            source,
        },
    }
}
