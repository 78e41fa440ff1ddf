//! Blocking HTTP fetches.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use super::DataSource;
use crate::error::DataError;

pub(crate) fn fetch(url: &Url, timeout: Duration) -> Result<Box<dyn Read + Send>, DataError> {
    let unreachable = |reason: String| DataError::UnreachableUrl {
        url: url.to_string(),
        reason,
    };

    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| unreachable(e.to_string()))?;

    let response = client
        .get(url.clone())
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| unreachable(e.to_string()))?;

    log::debug!("fetched {url} ({:?})", response.status());
    Ok(Box::new(response))
}

pub(super) fn url_source(url: Url, timeout: Duration) -> DataSource {
    let name = url_name(&url);
    DataSource::from_stream(name, move || {
        fetch(&url, timeout).map(Some).map_err(DataError::into_io)
    })
}

/// Last non-empty path segment of a URL.
fn url_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string())
}
