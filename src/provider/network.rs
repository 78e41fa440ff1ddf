use std::any::Any;
use std::time::Duration;

use regex::Regex;
use url::Url;

use super::{CrawlState, DataProvider, feed_source};
use crate::error::DataError;
use crate::filter::FiltersManager;
use crate::io::{DEFAULT_NETWORK_TIMEOUT, DataSource};
use crate::loader::DataLoader;

/// Provider reading an explicit list of URLs.
///
/// `file` URLs are always supported, `http` and `https` ones need the
/// `network` feature. A resource is only fetched when its filtered name is
/// supported.
#[derive(Debug, Clone)]
pub struct NetworkCrawler {
    id: String,
    urls: Vec<Url>,
    timeout: Duration,
}

impl NetworkCrawler {
    pub fn new(urls: Vec<Url>) -> Self {
        let id = urls
            .iter()
            .map(Url::as_str)
            .collect::<Vec<_>>()
            .join(",");
        Self {
            id,
            urls,
            timeout: DEFAULT_NETWORK_TIMEOUT,
        }
    }

    /// Parse and collect URLs.
    pub fn from_strs<I, S>(urls: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls = urls
            .into_iter()
            .map(|raw| {
                Url::parse(raw.as_ref()).map_err(|source| DataError::InvalidUrl {
                    url: raw.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(urls))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    /// Source reporting any failure to reach `url` as `UnreachableUrl`.
    fn url_source(&self, url: &Url) -> Result<DataSource, DataError> {
        let inner = DataSource::from_url_with_timeout(url, self.timeout)?;
        let opener = inner.opener().clone();
        let url = url.clone();
        Ok(DataSource::from_stream(inner.name(), move || {
            opener.open_stream_once().map_err(|e| match DataError::from(e) {
                DataError::Io(e) => DataError::UnreachableUrl {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
                .into_io(),
                other => other.into_io(),
            })
        }))
    }
}

impl DataProvider for NetworkCrawler {
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
        for url in &self.urls {
            if state.is_done(loader) {
                break;
            }

            let source = self.url_source(url)?;

            #[cfg(feature = "archives")]
            if super::is_archive_name(source.name()) {
                let mut bytes = Vec::new();
                if let Some(mut stream) = source.opener().open_stream_once()? {
                    std::io::Read::read_to_end(&mut stream, &mut bytes)?;
                }
                super::ZipJarCrawler::from_bytes(url.to_string(), bytes)
                    .crawl(supported, loader, filters, &mut state)?;
                continue;
            }

            feed_source(
                source,
                url.as_str(),
                supported,
                loader,
                filters,
                &mut state,
            )?;
        }
        Ok(state.loaded)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
