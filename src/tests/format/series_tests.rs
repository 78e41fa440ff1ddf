//! Tests for Poisson series evaluation.

use std::collections::BTreeMap;

use approx::assert_relative_eq;

use crate::format::nutation_codec::{self, MULTIPLIERS};
use crate::format::{FundamentalArguments, PoissonSeries, SeriesTerm};

/// Fundamental arguments moving linearly with time.
fn arguments(tc: f64) -> FundamentalArguments {
    let mut values = [0.0; MULTIPLIERS];
    let mut rates = [0.0; MULTIPLIERS];
    for k in 0..MULTIPLIERS {
        let base = 0.3 + 0.7 * k as f64;
        let rate = 1.5 + 11.0 * (k % 5) as f64;
        values[k] = base + rate * tc;
        rates[k] = rate;
    }
    FundamentalArguments::new(tc, values, rates)
}

fn term(multipliers: [i32; MULTIPLIERS], amplitudes: &[(f64, f64)]) -> (u64, SeriesTerm) {
    let mut term = SeriesTerm::new(multipliers);
    for (degree, &(sin, cos)) in amplitudes.iter().enumerate() {
        term.add(degree, sin, cos);
    }
    (nutation_codec::encode(&multipliers).unwrap(), term)
}

fn series(polynomial: Vec<f64>, terms: Vec<(u64, SeriesTerm)>) -> PoissonSeries {
    PoissonSeries::new(polynomial, terms.into_iter().collect::<BTreeMap<_, _>>())
}

fn first_series() -> PoissonSeries {
    let mut omega = [0; MULTIPLIERS];
    omega[5] = 1;
    let mut mixed = [0; MULTIPLIERS];
    mixed[3] = 2;
    mixed[4] = -2;
    mixed[5] = 2;
    series(
        vec![-0.5, 2.0, -0.3, 0.01],
        vec![
            term(omega, &[(-0.03, 0.001), (0.002, -0.0005), (1.0e-4, 0.0)]),
            term(mixed, &[(0.002, -0.001)]),
        ],
    )
}

fn second_series() -> PoissonSeries {
    let mut omega = [0; MULTIPLIERS];
    omega[5] = 1;
    let mut planetary = [0; MULTIPLIERS];
    planetary[8] = 1;
    planetary[9] = -3;
    series(
        vec![0.25, -1.0],
        vec![
            term(omega, &[(0.01, 0.02)]),
            term(planetary, &[(0.0, 0.0), (0.004, -0.002)]),
        ],
    )
}

#[test]
fn polynomial_only_series() {
    let series = series(vec![1.0, 2.0, 3.0], Vec::new());
    let args = arguments(0.5);
    assert_relative_eq!(series.value(&args), 1.0 + 2.0 * 0.5 + 3.0 * 0.25);
    assert_relative_eq!(series.derivative(&args), 2.0 + 6.0 * 0.5);
    assert_eq!(series.non_polynomial_size(), 0);
}

#[test]
fn single_term_value() {
    let mut multipliers = [0; MULTIPLIERS];
    multipliers[1] = 1;
    multipliers[5] = -2;
    let series = series(Vec::new(), vec![term(multipliers, &[(0.5, 0.25), (0.1, 0.0)])]);

    let args = arguments(0.2);
    let phase = args.values[1] - 2.0 * args.values[5];
    let expected = 0.5 * phase.sin() + 0.25 * phase.cos() + 0.2 * 0.1 * phase.sin();
    assert_relative_eq!(series.value(&args), expected, max_relative = 1e-14);
}

#[test]
fn amplitudes_are_accumulated() {
    let mut term = SeriesTerm::new([0; MULTIPLIERS]);
    term.add(2, 1.0, 2.0);
    term.add(0, 0.5, 0.0);
    term.add(2, 1.0, -1.0);
    assert_eq!(term.amplitudes, vec![(0.5, 0.0), (0.0, 0.0), (2.0, 1.0)]);
}

#[test]
fn derivative_matches_finite_differences() {
    let series = first_series();
    let h = 1.0e-6;
    for tc in [-0.4, 0.0, 0.13, 1.2] {
        let numeric =
            (series.value(&arguments(tc + h)) - series.value(&arguments(tc - h))) / (2.0 * h);
        assert_relative_eq!(
            series.derivative(&arguments(tc)),
            numeric,
            epsilon = 1.0e-7,
            max_relative = 1.0e-7
        );
    }
}

#[test]
fn compiled_series_match_independent_evaluation() {
    let first = first_series();
    let second = second_series();
    let compiled = PoissonSeries::compile(&[&first, &second]);
    assert_eq!(compiled.len(), 2);
    assert!(!compiled.is_empty());

    for tc in [-0.4, 0.0, 0.13, 1.2] {
        let args = arguments(tc);
        let values = compiled.value(&args);
        let derivatives = compiled.derivative(&args);

        assert_relative_eq!(values[0], first.value(&args), max_relative = 1e-15);
        assert_relative_eq!(values[1], second.value(&args), max_relative = 1e-15);
        assert_relative_eq!(derivatives[0], first.derivative(&args), max_relative = 1e-15);
        assert_relative_eq!(derivatives[1], second.derivative(&args), max_relative = 1e-15);
    }
}

#[test]
fn compiling_nothing_gives_empty_results() {
    let compiled = PoissonSeries::compile(&[]);
    assert!(compiled.is_empty());
    assert!(compiled.value(&arguments(0.0)).is_empty());
}
