//! Parser for IERS Poisson series tables.
//!
//! The tables published with the IERS conventions hold an optional
//! polynomial line followed by blocks such as:
//!
//! ```text
//!  j = 0  Nb of terms = 1306
//!
//!    1    -6844318.44     1328.67    0    0    0    0    1    0 ...
//! ```
//!
//! Blocks must appear in order `j = 0, 1, 2…` and hold exactly the announced
//! number of data lines; a data line found outside a block is an error. Lines of different blocks sharing the same
//! multipliers end up in a single term.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};

use regex::Regex;

use super::nutation_codec::{self, MULTIPLIERS};
use super::polynomial::PolynomialParser;
use super::series::{PoissonSeries, SeriesTerm};
use crate::error::{DataError, LoaderError};
use crate::loader::{DataLoader, LoadControl};

const HEADER_PATTERN: &str = r"^\s*j\s*=\s*(\d+)\s+Nb\s+of\s+terms\s*=\s*(\d+)\s*$";

const DELAUNAY: usize = 5;
const PLANETARY: usize = 9;

/// Columns of the sine and cosine amplitudes, with their scale factors.
///
/// Factors convert the table units to the unit of the series, e.g.
/// microarcseconds to radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinCosColumns {
    pub sin_column: usize,
    pub sin_factor: f64,
    pub cos_column: usize,
    pub cos_factor: f64,
}

impl SinCosColumns {
    pub fn new(sin_column: usize, sin_factor: f64, cos_column: usize, cos_factor: f64) -> Self {
        Self {
            sin_column,
            sin_factor,
            cos_column,
            cos_factor,
        }
    }
}

/// Layout of an IERS table. Columns are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PoissonSeriesConfig {
    /// Number of fields on every data line
    pub total_columns: usize,
    pub sin_cos: SinCosColumns,
    /// Parser for the polynomial part; when set the polynomial is mandatory
    pub polynomial: Option<PolynomialParser>,
    /// First of the five Delaunay columns `l, l', F, D, Ω`
    pub first_delaunay: Option<usize>,
    /// First of the nine planetary columns `L_Me … L_Ne, p_A`
    pub first_planetary: Option<usize>,
    /// Column holding the multiplier of `θg + π`
    pub gamma: Option<usize>,
    /// Column holding Doodson numbers such as `055.565`
    pub doodson: Option<usize>,
}

impl PoissonSeriesConfig {
    pub fn new(total_columns: usize, sin_cos: SinCosColumns) -> Self {
        Self {
            total_columns,
            sin_cos,
            polynomial: None,
            first_delaunay: None,
            first_planetary: None,
            gamma: None,
            doodson: None,
        }
    }

    pub fn with_polynomial(mut self, parser: PolynomialParser) -> Self {
        self.polynomial = Some(parser);
        self
    }

    pub fn with_first_delaunay(mut self, column: usize) -> Self {
        self.first_delaunay = Some(column);
        self
    }

    pub fn with_first_planetary(mut self, column: usize) -> Self {
        self.first_planetary = Some(column);
        self
    }

    pub fn with_gamma(mut self, column: usize) -> Self {
        self.gamma = Some(column);
        self
    }

    pub fn with_doodson(mut self, column: usize) -> Self {
        self.doodson = Some(column);
        self
    }

    /// Whether Delaunay columns follow the tidal sign convention.
    fn is_tidal(&self) -> bool {
        self.gamma.is_some() || self.doodson.is_some()
    }

    fn validate(&self) -> Result<(), DataError> {
        if let (Some(gamma), Some(doodson)) = (self.gamma, self.doodson) {
            return Err(DataError::ConflictingColumns { gamma, doodson });
        }

        let total = self.total_columns;
        let check = |first: usize, width: usize| {
            if first == 0 || first + width - 1 > total {
                Err(DataError::InvalidColumn {
                    column: first,
                    total,
                })
            } else {
                Ok(())
            }
        };

        check(self.sin_cos.sin_column, 1)?;
        check(self.sin_cos.cos_column, 1)?;
        if let Some(column) = self.first_delaunay {
            check(column, DELAUNAY)?;
        }
        if let Some(column) = self.first_planetary {
            check(column, PLANETARY)?;
        }
        if let Some(column) = self.gamma {
            check(column, 1)?;
        }
        if let Some(column) = self.doodson {
            check(column, 1)?;
        }
        Ok(())
    }
}

/// Parser turning IERS tables into [`PoissonSeries`].
#[derive(Debug, Clone)]
pub struct PoissonSeriesParser {
    config: PoissonSeriesConfig,
    header: Regex,
}

impl PoissonSeriesParser {
    /// Create a parser, checking the column layout.
    pub fn new(config: PoissonSeriesConfig) -> Result<Self, DataError> {
        config.validate()?;
        let header = Regex::new(HEADER_PATTERN).map_err(|source| DataError::InvalidPattern {
            pattern: HEADER_PATTERN.to_string(),
            source,
        })?;
        Ok(Self { config, header })
    }

    pub fn config(&self) -> &PoissonSeriesConfig {
        &self.config
    }

    /// Parse a whole table.
    pub fn parse(&self, input: &mut dyn Read, name: &str) -> Result<PoissonSeries, DataError> {
        let not_iers = || DataError::NotIersFile {
            name: name.to_string(),
        };

        let mut polynomial: Option<Vec<f64>> = None;
        let mut terms: BTreeMap<u64, SeriesTerm> = BTreeMap::new();
        let mut next_block = 0usize;
        let mut degree = 0usize;
        let mut remaining = 0usize;

        for (index, line) in BufReader::new(input).lines().enumerate() {
            let line = line?;
            let line_number = index + 1;

            if line.trim().is_empty() {
                continue;
            }

            if let Some(captures) = self.header.captures(&line) {
                if remaining > 0 {
                    return Err(not_iers());
                }
                let j: usize = captures[1].parse().map_err(|_| not_iers())?;
                let n: usize = captures[2].parse().map_err(|_| not_iers())?;
                if j != next_block {
                    return Err(not_iers());
                }
                next_block += 1;
                degree = j;
                remaining = n;
                continue;
            }

            if remaining > 0 {
                let (multipliers, sin, cos) = self.parse_data_line(&line, line_number, name)?;
                let key = nutation_codec::encode(&multipliers)
                    .ok_or_else(|| unparsable(&line, line_number, name))?;
                terms
                    .entry(key)
                    .or_insert_with(|| SeriesTerm::new(multipliers))
                    .add(degree, sin, cos);
                remaining -= 1;
                continue;
            }

            // data beyond the announced number of terms
            if next_block > 0 && self.parse_data_line(&line, line_number, name).is_ok() {
                return Err(not_iers());
            }

            if polynomial.is_none() {
                if let Some(parser) = &self.config.polynomial {
                    if line.contains('=') && line.contains(parser.variable) {
                        polynomial = parser.parse(&line);
                    }
                }
            }
        }

        if remaining > 0 {
            return Err(not_iers());
        }
        if self.config.polynomial.is_some() && polynomial.is_none() {
            return Err(not_iers());
        }
        if polynomial.is_none() && next_block == 0 {
            return Err(not_iers());
        }

        log::debug!("parsed {} Poisson terms from {name}", terms.len());
        Ok(PoissonSeries::new(polynomial.unwrap_or_default(), terms))
    }

    fn parse_data_line(
        &self,
        line: &str,
        line_number: usize,
        name: &str,
    ) -> Result<([i32; MULTIPLIERS], f64, f64), DataError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != self.config.total_columns {
            return Err(unparsable(line, line_number, name));
        }

        let float = |column: usize| -> Result<f64, DataError> {
            fields[column - 1]
                .parse::<f64>()
                .map_err(|_| unparsable(line, line_number, name))
        };
        let integer = |column: usize| -> Result<i32, DataError> {
            fields[column - 1]
                .parse::<i32>()
                .map_err(|_| unparsable(line, line_number, name))
        };

        let sin_cos = &self.config.sin_cos;
        let sin = float(sin_cos.sin_column)? * sin_cos.sin_factor;
        let cos = float(sin_cos.cos_column)? * sin_cos.cos_factor;

        let mut multipliers = [0i32; MULTIPLIERS];
        let tidal = self.config.is_tidal();

        if let Some(first) = self.config.first_delaunay {
            for k in 0..DELAUNAY {
                let n = integer(first + k)?;
                multipliers[1 + k] = if tidal { -n } else { n };
            }
        }
        if let Some(first) = self.config.first_planetary {
            for k in 0..PLANETARY {
                multipliers[1 + DELAUNAY + k] = integer(first + k)?;
            }
        }
        if let Some(column) = self.config.gamma {
            multipliers[0] = integer(column)?;
        }

        if let Some(column) = self.config.doodson {
            let from_doodson = doodson_multipliers(fields[column - 1])
                .ok_or_else(|| unparsable(line, line_number, name))?;
            if self.config.first_delaunay.is_some() && multipliers[1..=DELAUNAY] != from_doodson[1..]
            {
                return Err(DataError::InconsistentDoodson {
                    line: line_number,
                    name: name.to_string(),
                    text: line.to_string(),
                });
            }
            multipliers[..=DELAUNAY].copy_from_slice(&from_doodson);
        }

        Ok((multipliers, sin, cos))
    }
}

fn unparsable(line: &str, line_number: usize, name: &str) -> DataError {
    DataError::UnparsableLine {
        line: line_number,
        name: name.to_string(),
        text: line.to_string(),
    }
}

/// γ and Delaunay multipliers of a Doodson number.
///
/// The stored Delaunay multipliers are the opposite of the IERS `N_j`, so
/// that every argument reads `γ (θg + π) + Σ m_j F_j`.
fn doodson_multipliers(doodson: &str) -> Option<[i32; DELAUNAY + 1]> {
    let digits: Vec<i32> = doodson
        .chars()
        .filter(|&c| c != '.')
        .map(|c| c.to_digit(10).map(|d| d as i32))
        .collect::<Option<_>>()?;
    if digits.is_empty() || digits.len() > 6 {
        return None;
    }
    let mut padded = [0i32; 6];
    padded[6 - digits.len()..].copy_from_slice(&digits);

    let c_tau = padded[0];
    let c_s = padded[1] - 5;
    let c_h = padded[2] - 5;
    let c_p = padded[3] - 5;
    let c_n = padded[4] - 5;
    let c_ps = padded[5] - 5;

    let n_l = c_p;
    let n_lp = c_ps;
    let n_f = c_tau - c_s - c_h - c_p - c_ps;
    let n_d = c_h + c_ps;
    let n_omega = c_tau - c_s - c_h - c_p + c_n - c_ps;

    Some([c_tau, -n_l, -n_lp, -n_f, -n_d, -n_omega])
}

/// Loader parsing the first matching resource into a series.
#[derive(Debug)]
pub struct PoissonSeriesLoader {
    parser: PoissonSeriesParser,
    series: Option<PoissonSeries>,
}

impl PoissonSeriesLoader {
    pub fn new(parser: PoissonSeriesParser) -> Self {
        Self {
            parser,
            series: None,
        }
    }

    pub fn series(&self) -> Option<&PoissonSeries> {
        self.series.as_ref()
    }

    pub fn into_series(self) -> Option<PoissonSeries> {
        self.series
    }
}

impl DataLoader for PoissonSeriesLoader {
    fn still_accepts_data(&self) -> bool {
        self.series.is_none()
    }

    fn load_data(&mut self, input: &mut dyn Read, name: &str) -> Result<LoadControl, LoaderError> {
        self.series = Some(self.parser.parse(input, name)?);
        Ok(LoadControl::Stop)
    }
}
