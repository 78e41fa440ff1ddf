//! Evaluation of Poisson series.

use std::collections::BTreeMap;

use super::nutation_codec::MULTIPLIERS;

/// Snapshot of the fundamental arguments at one date.
///
/// Slots follow the multiplier order `[γ, l, l', F, D, Ω, L_Me, L_Ve, L_E,
/// L_Ma, L_J, L_Sa, L_U, L_Ne, p_A]`. `tc` is in Julian centuries and the
/// rates are per Julian century.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundamentalArguments {
    pub tc: f64,
    pub values: [f64; MULTIPLIERS],
    pub rates: [f64; MULTIPLIERS],
}

impl FundamentalArguments {
    pub fn new(tc: f64, values: [f64; MULTIPLIERS], rates: [f64; MULTIPLIERS]) -> Self {
        Self { tc, values, rates }
    }
}

/// Non-polynomial term sharing one argument.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTerm {
    /// Multipliers of the fundamental arguments
    pub multipliers: [i32; MULTIPLIERS],
    /// `(sin, cos)` amplitudes, indexed by power of time
    pub amplitudes: Vec<(f64, f64)>,
}

impl SeriesTerm {
    pub fn new(multipliers: [i32; MULTIPLIERS]) -> Self {
        Self {
            multipliers,
            amplitudes: Vec::new(),
        }
    }

    /// Add amplitudes for the given power of time.
    pub fn add(&mut self, degree: usize, sin: f64, cos: f64) {
        if self.amplitudes.len() <= degree {
            self.amplitudes.resize(degree + 1, (0.0, 0.0));
        }
        let (s, c) = &mut self.amplitudes[degree];
        *s += sin;
        *c += cos;
    }

    /// Argument and its rate.
    fn phase(&self, arguments: &FundamentalArguments) -> (f64, f64) {
        self.multipliers
            .iter()
            .zip(arguments.values.iter().zip(arguments.rates.iter()))
            .filter(|(m, _)| **m != 0)
            .fold((0.0, 0.0), |(phase, rate), (&m, (&v, &r))| {
                (phase + f64::from(m) * v, rate + f64::from(m) * r)
            })
    }
}

fn term_value(amplitudes: &[(f64, f64)], tc: f64, sin: f64, cos: f64) -> f64 {
    let mut value = 0.0;
    let mut power = 1.0;
    for &(s, c) in amplitudes {
        value += power * (s * sin + c * cos);
        power *= tc;
    }
    value
}

fn term_derivative(amplitudes: &[(f64, f64)], tc: f64, sin: f64, cos: f64, rate: f64) -> f64 {
    let mut derivative = 0.0;
    let mut previous_power = 0.0;
    let mut power = 1.0;
    for (j, &(s, c)) in amplitudes.iter().enumerate() {
        derivative += j as f64 * previous_power * (s * sin + c * cos)
            + power * rate * (s * cos - c * sin);
        previous_power = power;
        power *= tc;
    }
    derivative
}

fn polynomial_value(coefficients: &[f64], tc: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * tc + c)
}

fn polynomial_derivative(coefficients: &[f64], tc: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .fold(0.0, |acc, (k, c)| acc * tc + k as f64 * c)
}

/// A polynomial in time plus a sum of Poisson terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoissonSeries {
    /// Polynomial coefficients, lowest degree first
    pub polynomial: Vec<f64>,
    /// Terms keyed by their encoded multipliers
    pub terms: BTreeMap<u64, SeriesTerm>,
}

impl PoissonSeries {
    pub fn new(polynomial: Vec<f64>, terms: BTreeMap<u64, SeriesTerm>) -> Self {
        Self { polynomial, terms }
    }

    /// Number of distinct non-polynomial terms.
    pub fn non_polynomial_size(&self) -> usize {
        self.terms.len()
    }

    pub fn value(&self, arguments: &FundamentalArguments) -> f64 {
        let tc = arguments.tc;
        let mut value = 0.0;
        for term in self.terms.values() {
            let (phase, _) = term.phase(arguments);
            let (sin, cos) = phase.sin_cos();
            value += term_value(&term.amplitudes, tc, sin, cos);
        }
        value + polynomial_value(&self.polynomial, tc)
    }

    /// Derivative with respect to time, per Julian century.
    pub fn derivative(&self, arguments: &FundamentalArguments) -> f64 {
        let tc = arguments.tc;
        let mut derivative = 0.0;
        for term in self.terms.values() {
            let (phase, rate) = term.phase(arguments);
            let (sin, cos) = phase.sin_cos();
            derivative += term_derivative(&term.amplitudes, tc, sin, cos, rate);
        }
        derivative + polynomial_derivative(&self.polynomial, tc)
    }

    /// Fuse several series so that shared arguments are evaluated once.
    pub fn compile(series: &[&PoissonSeries]) -> CompiledPoissonSeries {
        let mut merged: BTreeMap<u64, CompiledTerm> = BTreeMap::new();
        for (index, s) in series.iter().enumerate() {
            for (key, term) in &s.terms {
                merged
                    .entry(*key)
                    .or_insert_with(|| CompiledTerm {
                        term: SeriesTerm::new(term.multipliers),
                        amplitudes: Vec::new(),
                    })
                    .amplitudes
                    .push((index, term.amplitudes.clone()));
            }
        }

        CompiledPoissonSeries {
            polynomials: series.iter().map(|s| s.polynomial.clone()).collect(),
            terms: merged.into_values().collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledTerm {
    term: SeriesTerm,
    amplitudes: Vec<(usize, Vec<(f64, f64)>)>,
}

/// Several series evaluated together.
///
/// Results match the independent evaluation of each series.
#[derive(Debug, Clone)]
pub struct CompiledPoissonSeries {
    polynomials: Vec<Vec<f64>>,
    terms: Vec<CompiledTerm>,
}

impl CompiledPoissonSeries {
    /// Number of fused series.
    pub fn len(&self) -> usize {
        self.polynomials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polynomials.is_empty()
    }

    pub fn value(&self, arguments: &FundamentalArguments) -> Vec<f64> {
        let tc = arguments.tc;
        let mut values = vec![0.0; self.polynomials.len()];
        for compiled in &self.terms {
            let (phase, _) = compiled.term.phase(arguments);
            let (sin, cos) = phase.sin_cos();
            for (index, amplitudes) in &compiled.amplitudes {
                values[*index] += term_value(amplitudes, tc, sin, cos);
            }
        }
        for (value, polynomial) in values.iter_mut().zip(&self.polynomials) {
            *value += polynomial_value(polynomial, tc);
        }
        values
    }

    pub fn derivative(&self, arguments: &FundamentalArguments) -> Vec<f64> {
        let tc = arguments.tc;
        let mut derivatives = vec![0.0; self.polynomials.len()];
        for compiled in &self.terms {
            let (phase, rate) = compiled.term.phase(arguments);
            let (sin, cos) = phase.sin_cos();
            for (index, amplitudes) in &compiled.amplitudes {
                derivatives[*index] += term_derivative(amplitudes, tc, sin, cos, rate);
            }
        }
        for (derivative, polynomial) in derivatives.iter_mut().zip(&self.polynomials) {
            *derivative += polynomial_derivative(polynomial, tc);
        }
        derivatives
    }
}
