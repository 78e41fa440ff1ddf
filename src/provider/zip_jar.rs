use std::any::Any;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use zip::ZipArchive;
use zip::result::ZipError;

use super::{CrawlState, DataProvider, feed_source, is_archive_name};
use crate::error::DataError;
use crate::filter::FiltersManager;
use crate::io::DataSource;
use crate::loader::DataLoader;

/// Upper bound on the buffer reserved from the size an entry declares.
const MAX_ENTRY_PREALLOCATION: u64 = 1 << 20;

trait ReadSeek: Read + Seek + Send {}
impl<T: Read + Seek + Send> ReadSeek for T {}

#[derive(Debug, Clone)]
enum Storage {
    File(PathBuf),
    Memory(Arc<[u8]>),
}

impl Storage {
    fn open(&self, name: &str) -> Result<ZipArchive<Box<dyn ReadSeek>>, DataError> {
        let reader: Box<dyn ReadSeek> = match self {
            Storage::File(path) => Box::new(std::fs::File::open(path)?),
            Storage::Memory(bytes) => Box::new(Cursor::new(Arc::clone(bytes))),
        };
        ZipArchive::new(reader).map_err(|e| archive_error(name, e))
    }
}

/// Initial buffer size for an entry; the declared size is not trusted.
pub(crate) fn entry_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_ENTRY_PREALLOCATION)).unwrap_or(0)
}

fn archive_error(name: &str, error: ZipError) -> DataError {
    match error {
        ZipError::Io(e) => DataError::Io(e),
        other => DataError::Archive {
            name: name.to_string(),
            reason: other.to_string(),
        },
    }
}

/// Provider reading the entries of a zip or jar archive.
///
/// Entries are only inflated when their filtered name is supported.
/// Archives stored inside the archive are crawled too, and every entry is
/// reported as `<archive>!/<entry path>`.
#[derive(Debug, Clone)]
pub struct ZipJarCrawler {
    name: String,
    storage: Storage,
}

impl ZipJarCrawler {
    /// Create a crawler for an archive file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::MissingRoot(path.to_path_buf()));
        }
        Ok(Self {
            name: path.display().to_string(),
            storage: Storage::File(path.to_path_buf()),
        })
    }

    /// Create a crawler for an archive held in memory.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            storage: Storage::Memory(Arc::from(bytes.into())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn crawl(
        &self,
        supported: &Regex,
        loader: &mut dyn DataLoader,
        filters: &FiltersManager,
        state: &mut CrawlState,
    ) -> Result<(), DataError> {
        let mut archive = self.storage.open(&self.name)?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive
                .by_index_raw(index)
                .map_err(|e| archive_error(&self.name, e))?;
            if !entry.is_dir() {
                entries.push((index, entry.name().to_string()));
            }
        }

        for (index, entry_path) in entries {
            if state.is_done(loader) {
                return Ok(());
            }

            let display_name = format!("{}!/{}", self.name, entry_path);

            if is_archive_name(&entry_path) {
                let mut entry = archive
                    .by_index(index)
                    .map_err(|e| archive_error(&display_name, e))?;
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes)?;
                drop(entry);
                ZipJarCrawler::from_bytes(display_name, bytes)
                    .crawl(supported, loader, filters, state)?;
                continue;
            }

            let bare = entry_path.rsplit('/').next().unwrap_or(&entry_path);
            let source = self.entry_source(bare, index, &display_name);
            feed_source(source, &display_name, supported, loader, filters, state)?;
        }
        Ok(())
    }

    /// Source inflating one entry when opened.
    fn entry_source(&self, bare_name: &str, index: usize, display_name: &str) -> DataSource {
        let storage = self.storage.clone();
        let archive_name = self.name.clone();
        let display_name = display_name.to_string();
        DataSource::from_stream(bare_name, move || {
            let mut archive = storage.open(&archive_name).map_err(DataError::into_io)?;
            let mut entry = archive
                .by_index(index)
                .map_err(|e| archive_error(&display_name, e).into_io())?;
            let mut bytes = Vec::with_capacity(entry_capacity(entry.size()));
            entry.read_to_end(&mut bytes)?;
            Ok(Some(Box::new(Cursor::new(bytes)) as Box<dyn Read + Send>))
        })
    }
}

impl DataProvider for ZipJarCrawler {
    fn id(&self) -> &str {
        &self.name
    }

    fn feed(
        &self,
        supported: &Regex,
        loader: &mut dyn DataLoader,
        filters: &FiltersManager,
    ) -> Result<bool, DataError> {
        let mut state = CrawlState::default();
        self.crawl(supported, loader, filters, &mut state)?;
        Ok(state.loaded)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
