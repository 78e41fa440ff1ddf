//! Data sources and the way they are opened.
//!
//! This module provides:
//! - `DataSource`: A named handle to some data
//! - `Opener`: Byte stream or text reader opener, bridged both ways
//! - Constructors for files, URLs and in-memory buffers

mod file;
mod memory;
mod source;

#[cfg(feature = "network")]
pub(crate) mod remote;

pub use file::DEFAULT_NETWORK_TIMEOUT;
pub use source::{DataSource, Opener, ReaderOpener, StreamOpener};
