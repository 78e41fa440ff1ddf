//! Configuration of data providers.
//!
//! This module provides:
//! - `DataConfig`: Serializable description of search paths, URLs and filters
//! - `ProviderSpec`: Classification of one search path segment
//! - `split_search_path`: Splitting of platform search path strings

mod pipeline;
mod spec;

pub use pipeline::{DATA_PATH_ENV, DataConfig, FilterName};
pub use spec::{ProviderKind, ProviderSpec, split_search_path};
