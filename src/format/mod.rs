//! Parsers and evaluators for IERS convention series.
//!
//! This module provides:
//! - `nutation_codec`: Packing of the 15 nutation multipliers into a `u64` key
//! - `PolynomialParser`: Parsing of polynomial expressions such as `X = a + b t + c t²`
//! - `PoissonSeriesParser`: Parsing of `j = k  Nb of terms = n` blocks into series
//! - `PoissonSeries` / `CompiledPoissonSeries`: Evaluation against fundamental arguments
//! - `PoissonSeriesLoader`: A `DataLoader` building a series from the first matching resource

pub mod nutation_codec;
mod poisson;
mod polynomial;
mod series;

pub use poisson::{PoissonSeriesConfig, PoissonSeriesLoader, PoissonSeriesParser, SinCosColumns};
pub use polynomial::{PolynomialParser, PolynomialUnit};
pub use series::{CompiledPoissonSeries, FundamentalArguments, PoissonSeries, SeriesTerm};
