//! Gzip decompression filter.

use std::io::Read;

use flate2::read::GzDecoder;

use super::DataFilter;
use crate::error::DataError;
use crate::io::DataSource;

const SUFFIX: &str = ".gz";

/// Filter decompressing `.gz` sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipFilter;

impl DataFilter for GzipFilter {
    fn id(&self) -> &str {
        "gzip"
    }

    fn filter(&self, original: &DataSource) -> Result<Option<DataSource>, DataError> {
        let Some(stripped) = original.name().strip_suffix(SUFFIX) else {
            return Ok(None);
        };
        if !original.opener().raw_data_is_binary() {
            return Ok(None);
        }

        let upstream = original.opener().clone();
        Ok(Some(DataSource::from_stream(stripped, move || {
            Ok(upstream
                .open_stream_once()?
                .map(|stream| Box::new(GzDecoder::new(stream)) as Box<dyn Read + Send>))
        })))
    }
}
