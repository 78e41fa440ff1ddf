//! Error types and policies for data loading.
//!
//! This module provides:
//! - `DataError`: Every failure the crawling, filtering and parsing layers report
//! - `ErrorPolicy`: Controls whether a feed stops at the first failing provider
//! - `Stage`: Indicates where an error occurred in the loading pipeline
//! - `ProviderError`: A single provider failure with context
//! - `FeedError`: The failures collected during one `feed` call

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Error raised by a caller-supplied loader.
pub type LoaderError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failing provider
    #[default]
    FastFail,
    /// Feed every provider, then report all failures together
    Accumulate,
}

impl FromStr for ErrorPolicy {
    type Err = DataError;

    /// Parse a policy from a configuration string, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast_fail" | "fastfail" | "fast-fail" => Ok(ErrorPolicy::FastFail),
            "accumulate" => Ok(ErrorPolicy::Accumulate),
            _ => Err(DataError::InvalidConfig(format!("unknown error policy '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Turning configuration into providers, patterns and URLs
    Resolve,
    /// Error while opening a root, an archive or a stream
    Open,
    /// Error raised by a decompression filter
    Filter,
    /// Error raised by the caller-supplied loader
    Load,
    Parse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolve => write!(f, "Resolve"),
            Stage::Open => write!(f, "Open"),
            Stage::Filter => write!(f, "Filter"),
            Stage::Load => write!(f, "Load"),
            Stage::Parse => write!(f, "Parse"),
        }
    }
}

/// Errors raised while discovering, decompressing and parsing data.
#[derive(Debug, Error)]
pub enum DataError {
    /// A configuration value is not recognized
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configured root does not exist
    #[error("data root {0} does not exist")]
    MissingRoot(PathBuf),

    /// A configured root exists but is neither a directory nor an archive
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    /// An embedded resource listed in the configuration is not available
    #[error("unable to find resource {0} among embedded assets")]
    MissingResource(String),

    /// A supported-names pattern does not compile
    #[error("invalid supported names pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A configured URL cannot be parsed
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A URL scheme cannot be fetched with the enabled features
    #[error("unsupported URL scheme for {0}")]
    UnsupportedUrl(String),

    /// A remote resource cannot be reached
    #[error("unable to reach {url}: {reason}")]
    UnreachableUrl { url: String, reason: String },

    /// A zip or jar archive is malformed
    #[error("unable to read archive {name}: {reason}")]
    Archive { name: String, reason: String },

    /// The two magic bytes of a `.Z` source do not match
    #[error("{name} is not a supported Unix-compressed file")]
    NotUnixCompressed { name: String },

    /// The LZW code stream of a `.Z` source is inconsistent
    #[error("corrupted Unix-compressed file {name}")]
    CorruptedCompress { name: String },

    /// A compressed stream ends in the middle of a code or header
    #[error("unexpected end of file {name}")]
    UnexpectedEndOfFile { name: String },

    /// The file does not follow the IERS series layout
    #[error("file {name} is not a supported IERS data file")]
    NotIersFile { name: String },

    /// A data line of an IERS series cannot be parsed
    #[error("unable to parse line {line} of file {name}:\n{text}")]
    UnparsableLine {
        line: usize,
        name: String,
        text: String,
    },

    /// A Doodson number disagrees with the Delaunay multipliers of its line
    #[error("inconsistent Doodson number on line {line} of file {name}:\n{text}")]
    InconsistentDoodson {
        line: usize,
        name: String,
        text: String,
    },

    /// Gamma and Doodson columns were both configured
    #[error("gamma column {gamma} and Doodson column {doodson} cannot be used together")]
    ConflictingColumns { gamma: usize, doodson: usize },

    /// A configured column lies outside the data lines
    #[error("column {column} is outside of the {total} columns of the data lines")]
    InvalidColumn { column: usize, total: usize },

    /// A caller-supplied loader failed; the message is the loader's own
    #[error("{source}")]
    Loader {
        name: String,
        #[source]
        source: LoaderError,
    },

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl DataError {
    /// Pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            DataError::InvalidConfig(_)
            | DataError::MissingRoot(_)
            | DataError::NotADirectory(_)
            | DataError::MissingResource(_)
            | DataError::InvalidPattern { .. }
            | DataError::InvalidUrl { .. }
            | DataError::UnsupportedUrl(_)
            | DataError::ConflictingColumns { .. }
            | DataError::InvalidColumn { .. } => Stage::Resolve,
            DataError::UnreachableUrl { .. } | DataError::Archive { .. } | DataError::Io(_) => {
                Stage::Open
            }
            DataError::NotUnixCompressed { .. }
            | DataError::CorruptedCompress { .. }
            | DataError::UnexpectedEndOfFile { .. } => Stage::Filter,
            DataError::NotIersFile { .. }
            | DataError::UnparsableLine { .. }
            | DataError::InconsistentDoodson { .. } => Stage::Parse,
            DataError::Loader { .. } => Stage::Load,
        }
    }

    /// Wrap this error so it can travel through `Read` implementations.
    pub fn into_io(self) -> io::Error {
        let kind = match &self {
            DataError::NotUnixCompressed { .. } => io::ErrorKind::Unsupported,
            DataError::UnexpectedEndOfFile { .. } => io::ErrorKind::UnexpectedEof,
            DataError::MissingRoot(_) | DataError::MissingResource(_) => io::ErrorKind::NotFound,
            DataError::Io(e) => e.kind(),
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, self)
    }
}

/// Recover a `DataError` that was carried inside an `io::Error`.
impl From<io::Error> for DataError {
    fn from(error: io::Error) -> Self {
        if !error
            .get_ref()
            .is_some_and(|inner| inner.is::<DataError>())
        {
            return DataError::Io(error);
        }
        let kind = error.kind();
        match error.into_inner().map(|inner| inner.downcast::<DataError>()) {
            Some(Ok(data_error)) => *data_error,
            Some(Err(inner)) => DataError::Io(io::Error::new(kind, inner)),
            None => DataError::Io(io::Error::from(kind)),
        }
    }
}

#[derive(Debug)]
pub struct ProviderError {
    /// Stage where the error occurred
    pub stage: Stage,
    /// Identifier of the provider (root path, archive, URL list…)
    pub provider: String,
    /// The underlying error
    pub error: DataError,
}

impl ProviderError {
    pub fn new(provider: impl Into<String>, error: DataError) -> Self {
        Self {
            stage: error.stage(),
            provider: provider.into(),
            error,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.provider, self.error)
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// The provider failures collected during one feed or one build.
///
/// Holds a single error under `ErrorPolicy::FastFail`.
#[derive(Debug, Error)]
pub struct FeedError {
    /// Collection of individual errors
    pub errors: Vec<ProviderError>,
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "data loading encountered {} error(s):", self.errors.len())?;
        for (i, e) in self.errors.iter().enumerate() {
            writeln!(f, "  #{}: {}", i + 1, e)?;
        }
        Ok(())
    }
}

impl FeedError {
    /// Create a new feed error with a single error.
    pub fn single(error: ProviderError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Check if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The first underlying error, if any.
    pub fn first(&self) -> Option<&DataError> {
        self.errors.first().map(|e| &e.error)
    }
}

impl From<ProviderError> for FeedError {
    fn from(error: ProviderError) -> Self {
        Self::single(error)
    }
}

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
