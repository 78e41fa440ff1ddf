use std::any::Any;
use std::fmt;
use std::io::{Cursor, Read};
use std::marker::PhantomData;

use regex::Regex;
use rust_embed::RustEmbed;

use super::{CrawlState, DataProvider, feed_source, is_archive_name};
use crate::error::DataError;
use crate::filter::FiltersManager;
use crate::io::DataSource;
use crate::loader::DataLoader;

/// Provider reading assets compiled into the binary with `rust-embed`.
///
/// ```rust,ignore
/// #[derive(rust_embed::RustEmbed)]
/// #[folder = "data/"]
/// struct Assets;
///
/// let crawler = EmbeddedCrawler::<Assets>::new(["UTC-TAI.history"])?;
/// ```
pub struct EmbeddedCrawler<E: RustEmbed> {
    id: String,
    resources: Vec<String>,
    _assets: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> EmbeddedCrawler<E> {
    /// Create a crawler for an explicit list of assets.
    ///
    /// Fails with `MissingResource` when an asset is not embedded.
    pub fn new<I, S>(resources: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resources: Vec<String> = resources.into_iter().map(Into::into).collect();
        if let Some(missing) = resources.iter().find(|r| E::get(r).is_none()) {
            return Err(DataError::MissingResource(missing.clone()));
        }
        Ok(Self {
            id: format!("embedded:{}", resources.join(",")),
            resources,
            _assets: PhantomData,
        })
    }

    /// Create a crawler for every embedded asset, in name order.
    pub fn all() -> Self {
        let mut resources: Vec<String> = E::iter().map(|name| name.into_owned()).collect();
        resources.sort();
        Self {
            id: "embedded:*".to_string(),
            resources,
            _assets: PhantomData,
        }
    }

    pub fn resources(&self) -> &[String] {
        &self.resources
    }
}

impl<E: RustEmbed> fmt::Debug for EmbeddedCrawler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedCrawler")
            .field("resources", &self.resources)
            .finish()
    }
}

impl<E: RustEmbed + 'static> DataProvider for EmbeddedCrawler<E> {
    fn id(&self) -> &str {
        &self.id
    }

    fn feed(
        &self,
        supported: &Regex,
        loader: &mut dyn DataLoader,
        filters: &FiltersManager,
    ) -> Result<bool, DataError> {
        let mut state = CrawlState::default();
        for resource in &self.resources {
            if state.is_done(loader) {
                break;
            }

            if is_archive_name(resource) {
                #[cfg(feature = "archives")]
                if let Some(asset) = E::get(resource) {
                    super::ZipJarCrawler::from_bytes(resource.clone(), asset.data.into_owned())
                        .crawl(supported, loader, filters, &mut state)?;
                }
                continue;
            }

            let bare = resource.rsplit('/').next().unwrap_or(resource);
            let path = resource.clone();
            let source = DataSource::from_stream(bare, move || {
                Ok(E::get(&path)
                    .map(|asset| Box::new(Cursor::new(asset.data)) as Box<dyn Read + Send>))
            });
            feed_source(source, resource, supported, loader, filters, &mut state)?;
        }
        Ok(state.loaded)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
