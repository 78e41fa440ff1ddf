//! Tests for tidal tables using Doodson numbers or a γ column.

use crate::error::DataError;
use crate::format::nutation_codec::{self, MULTIPLIERS};
use crate::format::{PoissonSeries, PoissonSeriesConfig, PoissonSeriesParser, SinCosColumns};

fn multipliers(gamma: i32, delaunay: [i32; 5]) -> [i32; MULTIPLIERS] {
    let mut multipliers = [0; MULTIPLIERS];
    multipliers[0] = gamma;
    multipliers[1..6].copy_from_slice(&delaunay);
    multipliers
}

fn doodson_config() -> PoissonSeriesConfig {
    // name, Doodson number, l l' F D Ω, sin, cos
    PoissonSeriesConfig::new(9, SinCosColumns::new(8, 1.0, 9, 1.0))
        .with_doodson(2)
        .with_first_delaunay(3)
}

fn parse(config: PoissonSeriesConfig, text: &str) -> Result<PoissonSeries, DataError> {
    PoissonSeriesParser::new(config)?.parse(&mut text.as_bytes(), "tides.txt")
}

fn term_multipliers(series: &PoissonSeries) -> Vec<[i32; MULTIPLIERS]> {
    series.terms.values().map(|t| t.multipliers).collect()
}

#[test]
fn doodson_numbers_give_gamma_and_delaunay_multipliers() {
    let text = "\
 j = 0  Nb of terms = 3
 Om1  055.565   0  0  0  0  1   -0.5   0.25
 Sa   056.554   0 -1  0  0  0    0.1   0.0
 Mf   075.555   0  0 -2  0 -2    1.0  -1.0
";
    let series = parse(doodson_config(), text).unwrap();
    let found = term_multipliers(&series);
    assert_eq!(series.non_polynomial_size(), 3);
    assert!(found.contains(&multipliers(0, [0, 0, 0, 0, -1])));
    assert!(found.contains(&multipliers(0, [0, 1, 0, 0, 0])));
    assert!(found.contains(&multipliers(0, [0, 0, 2, 0, 2])));

    let key = nutation_codec::encode(&multipliers(0, [0, 0, 2, 0, 2])).unwrap();
    assert_eq!(series.terms[&key].amplitudes, vec![(1.0, -1.0)]);
}

#[test]
fn diurnal_doodson_numbers_set_gamma() {
    let text = " j = 0  Nb of terms = 1\n K1  165.555  0 0 0 0 0  2.0  3.0\n";
    let series = parse(doodson_config(), text).unwrap();
    assert_eq!(term_multipliers(&series), vec![multipliers(1, [0; 5])]);
}

#[test]
fn doodson_without_delaunay_columns() {
    let config = PoissonSeriesConfig::new(4, SinCosColumns::new(3, 1.0, 4, 1.0)).with_doodson(2);
    let text = " j = 0  Nb of terms = 1\n Mf 75.555 1.0 -1.0\n";
    let series = parse(config, text).unwrap();
    assert_eq!(term_multipliers(&series), vec![multipliers(0, [0, 0, 2, 0, 2])]);
}

#[test]
fn inconsistent_doodson_number_is_rejected() {
    let text = " j = 0  Nb of terms = 1\n Mf   075.555   0  0 -2  0 -1    1.0  -1.0\n";
    match parse(doodson_config(), text) {
        Err(DataError::InconsistentDoodson { line, name, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(name, "tides.txt");
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn malformed_doodson_number_is_unparsable() {
    let text = " j = 0  Nb of terms = 1\n Mf   07x.555   0  0 -2  0 -2    1.0  -1.0\n";
    assert!(matches!(
        parse(doodson_config(), text),
        Err(DataError::UnparsableLine { line: 2, .. })
    ));
}

#[test]
fn gamma_column_uses_tidal_sign_convention() {
    // γ, l l' F D Ω, sin, cos
    let config = PoissonSeriesConfig::new(8, SinCosColumns::new(7, 1.0, 8, 1.0))
        .with_gamma(1)
        .with_first_delaunay(2);
    let text = " j = 0  Nb of terms = 1\n 1  0 0 0 0 1  0.5 -0.25\n";
    let series = parse(config, text).unwrap();
    assert_eq!(term_multipliers(&series), vec![multipliers(1, [0, 0, 0, 0, -1])]);
}
