//! # astrodata
//!
//! Discovery, decompression and parsing of astrodynamics data resources.
//!
//! ## Overview
//!
//! astrodata provides:
//! - **Pluggable providers**: Directory trees, zip/jar archives, embedded assets and URLs
//! - **Transparent decompression**: Gzip (`.gz`) and Unix compress (`.Z`) filters, stacked as needed
//! - **Pattern based feeding**: Loaders receive every resource whose bare name matches a regex
//! - **Error handling**: Configurable error policies (FastFail or Accumulate)
//! - **Configuration**: Search paths, URLs and filters from YAML/JSON or `ASTRODATA_PATH`
//! - **IERS series**: Polynomial and Poisson series parsers with fused evaluation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use astrodata::{DataProvidersBuilder, ErrorPolicy, FnLoader};
//! use std::io::Read;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut manager = DataProvidersBuilder::new()
//!         .add_search_path("/data/orekit-data:/data/extra.zip")
//!         .with_mode(ErrorPolicy::Accumulate)
//!         .build()?;
//!
//!     let mut loader = FnLoader(|input: &mut dyn Read, name: &str| {
//!         let mut text = String::new();
//!         input.read_to_string(&mut text)?;
//!         println!("{name}: {} lines", text.lines().count());
//!         Ok(())
//!     });
//!
//!     let found = manager.feed(r"UTC-TAI\.history", &mut loader)?;
//!     assert!(found);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `gzip` - Gzip filter (enabled by default)
//! - `archives` - Zip and jar archives (enabled by default)
//! - `yaml` - YAML configuration files (enabled by default)
//! - `json` - JSON configuration files
//! - `network` - HTTP(S) resources with reqwest
//! - `embedded` - Assets compiled in with rust-embed
//! - `miette` - Pretty error reporting with miette
//! - `sarge` - The `astrodata_scan` command line tool
//!
//! ## Feeding semantics
//!
//! - The pattern given to [`DataProvidersManager::feed`] must match the whole
//!   bare name of a resource, after decompression filters removed their
//!   suffixes: `UTC-TAI\.history` matches `data/UTC-TAI.history.Z` and
//!   `eop.zip!/2010/UTC-TAI.history` alike.
//! - Providers are visited in registration order until the loader stops
//!   accepting data. Every provider is tried; `feed` returns true when any
//!   of them loaded something.
//! - Loaders never see partially filtered data: decompression happens while
//!   they read, and decoding errors surface as `io::Error`s wrapping a
//!   [`DataError`].

// Core modules
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod io;
pub mod loader;
pub mod manager;
pub mod provider;

// Re-exports for convenience
pub use builder::DataProvidersBuilder;
pub use config::{DataConfig, ProviderKind, ProviderSpec};
pub use error::{DataError, ErrorPolicy, FeedError, LoaderError, ProviderError, Stage};
#[cfg(feature = "gzip")]
pub use filter::GzipFilter;
pub use filter::{DataFilter, FiltersManager, UnixCompressFilter, UnixCompressReader};
pub use format::{
    CompiledPoissonSeries, FundamentalArguments, PoissonSeries, PoissonSeriesConfig,
    PoissonSeriesLoader, PoissonSeriesParser, PolynomialParser, PolynomialUnit, SeriesTerm,
    SinCosColumns,
};
pub use io::{DataSource, Opener};
pub use loader::{DataLoader, FnLoader, LoadControl};
pub use manager::DataProvidersManager;
#[cfg(feature = "embedded")]
pub use provider::EmbeddedCrawler;
#[cfg(feature = "archives")]
pub use provider::ZipJarCrawler;
pub use provider::{DataProvider, DirectoryCrawler, NetworkCrawler};

/// Build a DataProvidersManager from a DataConfig.
pub fn build_manager_from_config(config: DataConfig) -> Result<DataProvidersManager, FeedError> {
    DataProvidersBuilder::from_config(config)?.build()
}

/// Build a DataProvidersManager from a DataConfig, allowing the caller to
/// further customize the builder before it is built, e.g. to register
/// embedded assets or extra filters.
pub fn build_manager_from_config_with<F>(
    config: DataConfig,
    customize: F,
) -> Result<DataProvidersManager, FeedError>
where
    F: FnOnce(DataProvidersBuilder) -> DataProvidersBuilder,
{
    let builder = DataProvidersBuilder::from_config(config)?;
    customize(builder).build()
}

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::DataDiagnostic;
