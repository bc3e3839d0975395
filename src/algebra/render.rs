//! Text rendering for expressions.
//!
//! The output is plain infix text readable by [`Expr::parse`] and by common
//! computer algebra systems: `t_1/2 + 3*T**2/(4*t_0) - 1`. Terms appear in
//! descending monomial order (symbols compared by name, so `t_1` sorts after
//! `T`); within one symbol higher powers lead, and the constant term comes
//! last.

use std::fmt;

use num_rational::BigRational;
use num_traits::{One, Signed};

use super::expr::{Expr, Monomial};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        for (position, (monomial, coefficient)) in self.terms().rev().enumerate() {
            let negative = coefficient.is_negative();
            match (position, negative) {
                (0, true) => f.write_str("-")?,
                (0, false) => {}
                (_, true) => f.write_str(" - ")?,
                (_, false) => f.write_str(" + ")?,
            }
            write_term(f, monomial, &coefficient.abs())?;
        }
        Ok(())
    }
}

fn write_term(f: &mut fmt::Formatter<'_>, monomial: &Monomial, magnitude: &BigRational) -> fmt::Result {
    let mut numerator: Vec<String> = Vec::new();
    let mut denominator: Vec<String> = Vec::new();

    let raised: Vec<String> = monomial
        .factors()
        .filter(|(_, e)| *e > 0)
        .map(|(s, e)| power(s.as_str(), e))
        .collect();
    let lowered: Vec<String> = monomial
        .factors()
        .filter(|(_, e)| *e < 0)
        .map(|(s, e)| power(s.as_str(), -e))
        .collect();

    if !magnitude.numer().is_one() || raised.is_empty() {
        numerator.push(magnitude.numer().to_string());
    }
    numerator.extend(raised);

    if !magnitude.denom().is_one() {
        denominator.push(magnitude.denom().to_string());
    }
    denominator.extend(lowered);

    f.write_str(&numerator.join("*"))?;
    match denominator.len() {
        0 => Ok(()),
        1 => write!(f, "/{}", denominator[0]),
        _ => write!(f, "/({})", denominator.join("*")),
    }
}

fn power(name: &str, exponent: i32) -> String {
    if exponent == 1 {
        name.to_string()
    } else {
        format!("{name}**{exponent}")
    }
}
