//! Parser for the polynomial parts of IERS series.

use std::f64::consts::PI;
use std::sync::LazyLock;

use regex::Regex;

/// Unit applied to coefficients that carry no explicit unit marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolynomialUnit {
    Radians,
    Degrees,
    ArcSeconds,
    MilliArcSeconds,
    MicroArcSeconds,
    /// Coefficients are kept as written
    NoUnits,
}

impl PolynomialUnit {
    /// Convert a value expressed in this unit, to radians unless `NoUnits`.
    pub fn to_si(self, value: f64) -> f64 {
        const ARC_SECOND: f64 = PI / (180.0 * 3600.0);
        match self {
            PolynomialUnit::Radians | PolynomialUnit::NoUnits => value,
            PolynomialUnit::Degrees => value.to_radians(),
            PolynomialUnit::ArcSeconds => value * ARC_SECOND,
            PolynomialUnit::MilliArcSeconds => value * ARC_SECOND * 1.0e-3,
            PolynomialUnit::MicroArcSeconds => value * ARC_SECOND * 1.0e-6,
        }
    }
}

/// Parser for expressions such as
/// `X = -16616.99 + 2004191742.88 t - 427219.05 t^2`.
///
/// Only the part after the last `=` is read. Each term is an optional sign
/// (`+`, `-` or `−`), a coefficient, an optional unit marker (`°` for
/// degrees, `″`, `''` or `"` for arcseconds) and an optional power of the
/// variable written `t`, `t^n` or with superscript digits (`t²`). Terms of
/// the same degree are summed. Degrees above 20 are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialParser {
    pub variable: char,
    pub unit: PolynomialUnit,
}

const MAX_DEGREE: usize = 20;

static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(?P<sign>[+\-−])?\s*(?P<coef>(?:\d+\.?\d*|\.\d+)(?:[eE][+\-]?\d+)?)\s*(?P<unit>°|″|''|")?\s*(?:(?P<var>\p{Alphabetic})\s*(?:\^\s*(?P<pow>\d+)|(?P<sup>[⁰¹²³⁴⁵⁶⁷⁸⁹]+))?)?"#,
    )
    .expect("valid polynomial term pattern")
});

impl PolynomialParser {
    pub fn new(variable: char, unit: PolynomialUnit) -> Self {
        Self { variable, unit }
    }

    /// Coefficients of the polynomial, lowest degree first, in radians.
    ///
    /// Returns `None` when the expression is not a polynomial in the
    /// configured variable.
    pub fn parse(&self, expression: &str) -> Option<Vec<f64>> {
        let rhs = expression.rsplit('=').next()?;

        let mut coefficients: Vec<f64> = Vec::new();
        let mut rest = rhs;
        while !rest.trim().is_empty() {
            let captures = TERM.captures(rest)?;
            let sign = captures.name("sign").map(|m| m.as_str());
            if sign.is_none() && !coefficients.is_empty() {
                return None;
            }

            let magnitude: f64 = captures.name("coef")?.as_str().parse().ok()?;
            let unit = match captures.name("unit").map(|m| m.as_str()) {
                Some("°") => PolynomialUnit::Degrees,
                Some(_) => PolynomialUnit::ArcSeconds,
                None => self.unit,
            };
            let value = unit.to_si(match sign {
                Some("-") | Some("−") => -magnitude,
                _ => magnitude,
            });

            let degree = match captures.name("var") {
                None => 0,
                Some(var) if !var.as_str().starts_with(self.variable) => return None,
                Some(_) => {
                    if let Some(power) = captures.name("pow") {
                        power.as_str().parse().ok()?
                    } else if let Some(superscript) = captures.name("sup") {
                        parse_superscript(superscript.as_str())?
                    } else {
                        1
                    }
                }
            };
            if degree > MAX_DEGREE {
                return None;
            }

            if coefficients.len() <= degree {
                coefficients.resize(degree.checked_add(1)?, 0.0);
            }
            coefficients[degree] += value;

            rest = &rest[captures.get(0)?.end()..];
        }

        if coefficients.is_empty() {
            None
        } else {
            Some(coefficients)
        }
    }
}

fn parse_superscript(digits: &str) -> Option<usize> {
    digits.chars().try_fold(0usize, |acc, c| {
        let digit = match c {
            '⁰' => 0,
            '¹' => 1,
            '²' => 2,
            '³' => 3,
            '⁴' => 4,
            '⁵' => 5,
            '⁶' => 6,
            '⁷' => 7,
            '⁸' => 8,
            '⁹' => 9,
            _ => return None,
        };
        acc.checked_mul(10)?.checked_add(digit)
    })
}
