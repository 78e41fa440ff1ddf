//! In-memory data sources.

use std::io::{BufRead, Cursor, Read};
use std::sync::Arc;

use super::DataSource;

impl DataSource {
    /// Create a binary source over a byte buffer.
    ///
    /// The buffer is shared between clones and each open gets its own cursor.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data: Arc<[u8]> = Arc::from(data.into());
        DataSource::from_stream(name, move || {
            Ok(Some(Box::new(Cursor::new(Arc::clone(&data))) as Box<dyn Read + Send>))
        })
    }

    /// Create a text source over a string.
    pub fn from_string(name: impl Into<String>, text: impl Into<String>) -> Self {
        let data: Arc<[u8]> = Arc::from(text.into().into_bytes());
        DataSource::from_reader(name, move || {
            Ok(Some(Box::new(Cursor::new(Arc::clone(&data))) as Box<dyn BufRead + Send>))
        })
    }
}
