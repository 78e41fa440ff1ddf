//! Named, lazily opened data handles.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::Arc;

/// Function opening a fresh byte stream, or nothing.
pub type StreamOpener = Arc<dyn Fn() -> io::Result<Option<Box<dyn Read + Send>>> + Send + Sync>;

/// Function opening a fresh UTF-8 text reader, or nothing.
pub type ReaderOpener =
    Arc<dyn Fn() -> io::Result<Option<Box<dyn BufRead + Send>>> + Send + Sync>;

/// The way a [`DataSource`] reaches its content.
///
/// Either kind can be opened through both accessors: a stream opened as a
/// reader is decoded as UTF-8, a reader opened as a stream exposes its UTF-8
/// bytes.
#[derive(Clone)]
pub enum Opener {
    /// Raw bytes, possibly compressed
    Stream(StreamOpener),
    /// Already decoded text
    Reader(ReaderOpener),
}

impl Opener {
    /// Whether the underlying content is raw bytes.
    ///
    /// Decompression filters only apply to binary sources.
    pub fn raw_data_is_binary(&self) -> bool {
        matches!(self, Opener::Stream(_))
    }

    /// Open a fresh byte stream.
    ///
    /// Returns `Ok(None)` when the opener itself has nothing to provide.
    pub fn open_stream_once(&self) -> io::Result<Option<Box<dyn Read + Send>>> {
        match self {
            Opener::Stream(open) => open(),
            Opener::Reader(open) => Ok(open()?.map(|reader| Box::new(reader) as Box<dyn Read + Send>)),
        }
    }

    /// Open a fresh text reader.
    ///
    /// Returns `Ok(None)` when the opener itself has nothing to provide.
    pub fn open_reader_once(&self) -> io::Result<Option<Box<dyn BufRead + Send>>> {
        match self {
            Opener::Stream(open) => {
                Ok(open()?.map(|stream| Box::new(BufReader::new(stream)) as Box<dyn BufRead + Send>))
            }
            Opener::Reader(open) => open(),
        }
    }
}

impl fmt::Debug for Opener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opener::Stream(_) => f.write_str("Opener::Stream"),
            Opener::Reader(_) => f.write_str("Opener::Reader"),
        }
    }
}

/// A named handle to some data.
///
/// Cloning is cheap; every open call yields a new stream positioned at the
/// beginning of the content.
#[derive(Debug, Clone)]
pub struct DataSource {
    name: String,
    opener: Opener,
}

impl DataSource {
    /// Create a source from an opener.
    pub fn new(name: impl Into<String>, opener: Opener) -> Self {
        Self {
            name: name.into(),
            opener,
        }
    }

    /// Create a binary source from a stream-opening function.
    pub fn from_stream<F>(name: impl Into<String>, open: F) -> Self
    where
        F: Fn() -> io::Result<Option<Box<dyn Read + Send>>> + Send + Sync + 'static,
    {
        Self::new(name, Opener::Stream(Arc::new(open)))
    }

    /// Create a text source from a reader-opening function.
    pub fn from_reader<F>(name: impl Into<String>, open: F) -> Self
    where
        F: Fn() -> io::Result<Option<Box<dyn BufRead + Send>>> + Send + Sync + 'static,
    {
        Self::new(name, Opener::Reader(Arc::new(open)))
    }

    /// Name of the source, a bare file name for path-derived sources.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn opener(&self) -> &Opener {
        &self.opener
    }
}
