//! Data sources backed by files and URLs.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use super::DataSource;
use crate::error::DataError;

/// Timeout applied to remote fetches when none is configured.
pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(10);

/// Final segment of a path, or the whole path when it has none.
fn bare_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

impl DataSource {
    /// Create a binary source reading a file.
    ///
    /// The source is named after the final segment of the path. The file is
    /// only opened when the stream is requested.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path: PathBuf = path.as_ref().to_path_buf();
        let name = bare_name(&path);
        DataSource::from_stream(name, move || {
            Ok(Some(Box::new(File::open(&path)?) as Box<dyn Read + Send>))
        })
    }

    /// Create a binary source reading a URL, with the default timeout.
    pub fn from_url(url: &Url) -> Result<Self, DataError> {
        Self::from_url_with_timeout(url, DEFAULT_NETWORK_TIMEOUT)
    }

    /// Create a binary source reading a URL.
    ///
    /// `file` URLs are read from disk. `http` and `https` URLs need the
    /// `network` feature; any other scheme is rejected.
    pub fn from_url_with_timeout(url: &Url, timeout: Duration) -> Result<Self, DataError> {
        match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| DataError::UnsupportedUrl(url.to_string()))?;
                Ok(DataSource::from_path(path))
            }
            #[cfg(feature = "network")]
            "http" | "https" => Ok(super::remote::url_source(url.clone(), timeout)),
            _ => {
                let _ = timeout;
                Err(DataError::UnsupportedUrl(url.to_string()))
            }
        }
    }
}
