//! Todd generating-function engine.
//!
//! `Td(s, w)` is the coefficient of `z^s` in `∏ᵢ wᵢz / (1 − e^{−wᵢz})`. From
//! it the building blocks of the counting polynomial are assembled:
//!
//! ```text
//! R_k(λ; w_1..w_k) = (1 / ∏ wᵢ) · Σ_{j=0}^{k} λ^j / j! · Td(k − j, w)
//! ```
//!
//! `R_k` has degree exactly `k` in λ and `R_0 = 1`.

pub mod bernoulli;
pub mod table;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use crate::algebra::{Expr, ExprError, Symbol};

pub use bernoulli::{bernoulli_numbers, todd_series};
pub use table::{CacheStats, RkTable};

/// Prefix of the generic weight symbols `w_1, w_2, ...`.
pub const WEIGHT_PREFIX: &str = "w";

/// Error type for the Todd engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToddError {
    /// A weight is exactly zero.
    #[error("Weight {index} is zero")]
    DegenerateWeight {
        /// Position of the weight.
        index: usize,
    },
    /// A weight has more than one term and cannot be divided by.
    #[error("Weight {index} is not invertible: {weight}")]
    NonInvertibleWeight {
        /// Position of the weight.
        index: usize,
        /// Rendered weight.
        weight: String,
    },
    /// Wrong number of weights for the polynomial order.
    #[error("Expected {expected} weights, got {actual}")]
    WeightCount {
        /// Weights the polynomial takes.
        expected: usize,
        /// Weights supplied.
        actual: usize,
    },
    /// Underlying algebra failure.
    #[error(transparent)]
    Algebra(#[from] ExprError),
}

/// Truncated power series in `z`, indexed by power.
fn truncated_product(series: &[BigRational], weights: &[Expr], order: usize) -> Vec<Expr> {
    let mut product = vec![Expr::one()];
    for weight in weights {
        // c_j · w^j for j ≤ order
        let mut factor = Vec::with_capacity(order + 1);
        let mut power = Expr::one();
        for c in series.iter().take(order + 1) {
            factor.push(power.scale(c));
            power = &power * weight;
        }

        let width = (product.len() + factor.len() - 1).min(order + 1);
        let mut next = vec![Expr::zero(); width];
        for (i, a) in product.iter().enumerate() {
            for (j, b) in factor.iter().enumerate() {
                if i + j < width {
                    next[i + j] += a * b;
                }
            }
        }
        while next.len() > 1 && next.last().is_some_and(Expr::is_zero) {
            next.pop();
        }
        product = next;
    }
    product
}

/// `Td(order, weights)`: coefficient of `z^order` in the Todd product.
///
/// `Td(0, w) = 1` for any weights, and `Td(s, []) = 0` for `s > 0`.
pub fn td(order: usize, weights: &[Expr]) -> Expr {
    let series = todd_series(order);
    truncated_product(&series, weights, order)
        .into_iter()
        .nth(order)
        .unwrap_or_else(Expr::zero)
}

fn check_weights(weights: &[Expr]) -> Result<Expr, ToddError> {
    let mut inverse = Expr::one();
    for (index, weight) in weights.iter().enumerate() {
        let w_inv = weight.try_inverse().map_err(|e| match e {
            ExprError::DivisionByZero => ToddError::DegenerateWeight { index },
            _ => ToddError::NonInvertibleWeight {
                index,
                weight: weight.to_string(),
            },
        })?;
        inverse = &inverse * &w_inv;
    }
    Ok(inverse)
}

/// Build `R_k(λ; weights)` with `k = weights.len()`.
///
/// Fails on a zero weight, or a weight with several terms.
pub fn build_rk(order: usize, weights: &[Expr]) -> Result<ToddPolynomial, ToddError> {
    if weights.len() != order {
        return Err(ToddError::WeightCount {
            expected: order,
            actual: weights.len(),
        });
    }
    let inverse = check_weights(weights)?;
    let series = todd_series(order);
    let product = truncated_product(&series, weights, order);

    let mut coefficients = Vec::with_capacity(order + 1);
    let mut factorial = BigInt::one();
    for j in 0..=order {
        if j > 0 {
            factorial *= BigInt::from(j);
        }
        let td = product.get(order - j).cloned().unwrap_or_else(Expr::zero);
        let scale = BigRational::new(BigInt::one(), factorial.clone());
        coefficients.push((&td * &inverse).scale(&scale));
    }

    Ok(ToddPolynomial {
        order,
        parameters: Vec::new(),
        coefficients,
    })
}

/// Generic weight symbols `w_1 ..= w_k`.
pub fn generic_weights(k: usize) -> Vec<Symbol> {
    (1..=k).map(|i| Symbol::indexed(WEIGHT_PREFIX, i)).collect()
}

/// `R_k` as its λ-coefficients.
///
/// A generic polynomial keeps its weights as `parameters` (symbols
/// `w_1..w_k`) to be fixed later by [`specialize`](Self::specialize).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToddPolynomial {
    order: usize,
    parameters: Vec<Symbol>,
    coefficients: Vec<Expr>,
}

impl ToddPolynomial {
    /// `R_k` over the symbolic weights `w_1..w_k`.
    pub fn generic(order: usize) -> Result<Self, ToddError> {
        let parameters = generic_weights(order);
        let weights: Vec<Expr> = parameters.iter().map(Expr::from).collect();
        let mut polynomial = build_rk(order, &weights)?;
        polynomial.parameters = parameters;
        Ok(polynomial)
    }

    /// The order `k`, equal to the λ-degree.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Symbols still standing for weights.
    pub fn parameters(&self) -> &[Symbol] {
        &self.parameters
    }

    /// Coefficient of `λ^power`.
    pub fn coefficient(&self, power: usize) -> Option<&Expr> {
        self.coefficients.get(power)
    }

    /// Fix the weight parameters.
    pub fn specialize(&self, weights: &[Expr]) -> Result<ToddPolynomial, ToddError> {
        if weights.len() != self.parameters.len() {
            return Err(ToddError::WeightCount {
                expected: self.parameters.len(),
                actual: weights.len(),
            });
        }
        check_weights(weights)?;
        let bindings: BTreeMap<Symbol, Expr> = self
            .parameters
            .iter()
            .cloned()
            .zip(weights.iter().cloned())
            .collect();
        let coefficients = self
            .coefficients
            .iter()
            .map(|c| c.substitute(&bindings))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ToddPolynomial {
            order: self.order,
            parameters: Vec::new(),
            coefficients,
        })
    }

    /// Value at `λ = lambda` by Horner's rule.
    pub fn evaluate(&self, lambda: &Expr) -> Expr {
        self.coefficients
            .iter()
            .rev()
            .fold(Expr::zero(), |acc, c| &(&acc * lambda) + c)
    }

    /// The polynomial as an expression in `lambda`.
    pub fn to_expr(&self, lambda: &Symbol) -> Expr {
        self.evaluate(&Expr::from(lambda))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    fn w(i: usize) -> Expr {
        Expr::symbol(Symbol::indexed("w", i))
    }

    #[test]
    fn test_td_base_cases() {
        assert!(td(0, &[]).is_one());
        assert!(td(0, &[w(1), w(2)]).is_one());
        assert!(td(3, &[]).is_zero());
    }

    #[test]
    fn test_td_low_orders() {
        // Td(1) = (w_1 + w_2)/2
        assert_eq!(td(1, &[w(1), w(2)]), (w(1) + w(2)).scale(&q(1, 2)));
        // Td(2) = w_1²/12 + w_1 w_2/4 + w_2²/12
        let expected = w(1).pow(2).scale(&q(1, 12)) + (&w(1) * &w(2)).scale(&q(1, 4)) + w(2).pow(2).scale(&q(1, 12));
        assert_eq!(td(2, &[w(1), w(2)]), expected);
    }

    #[test]
    fn test_rk_zero_is_one() {
        let r0 = build_rk(0, &[]).unwrap();
        assert_eq!(r0.order(), 0);
        assert!(r0.evaluate(&Expr::symbol("lambda")).is_one());
    }

    #[test]
    fn test_r1_closed_form() {
        // R_1(λ; w) = λ/w + 1/2
        let r1 = ToddPolynomial::generic(1).unwrap();
        let lambda = Symbol::new("lambda");
        let expected = Expr::from(&lambda).checked_div(&w(1)).unwrap() + Expr::constant(q(1, 2));
        assert_eq!(r1.to_expr(&lambda), expected);
    }

    #[test]
    fn test_degree_is_order() {
        let lambda = Symbol::new("lambda");
        for k in 0..5 {
            let rk = ToddPolynomial::generic(k).unwrap();
            assert_eq!(rk.to_expr(&lambda).degree_in(&lambda), Some(k as i32));
        }
    }

    #[test]
    fn test_specialize_matches_direct_build() {
        let generic = ToddPolynomial::generic(3).unwrap();
        let weights = vec![Expr::symbol("t_0").scale_int(2), Expr::integer(3), Expr::symbol("t_2")];
        let direct = build_rk(3, &weights).unwrap();
        let specialized = generic.specialize(&weights).unwrap();
        assert_eq!(specialized, direct);
        assert!(specialized.parameters().is_empty());
    }

    #[test]
    fn test_zero_weight_is_degenerate() {
        let err = build_rk(2, &[Expr::one(), Expr::zero()]).unwrap_err();
        assert_eq!(err, ToddError::DegenerateWeight { index: 1 });

        let generic = ToddPolynomial::generic(1).unwrap();
        let err = generic.specialize(&[Expr::zero()]).unwrap_err();
        assert_eq!(err, ToddError::DegenerateWeight { index: 0 });
    }

    #[test]
    fn test_weight_count_mismatch() {
        let generic = ToddPolynomial::generic(2).unwrap();
        assert_eq!(
            generic.specialize(&[Expr::one()]),
            Err(ToddError::WeightCount { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_numeric_r2() {
        // unit weights: R_2(λ) = λ²/2 + λ + 5/12
        let r2 = build_rk(2, &[Expr::one(), Expr::one()]).unwrap();
        let value = r2.evaluate(&Expr::integer(2)).as_constant().unwrap();
        assert_eq!(value, q(53, 12));
        assert!(!value.is_zero());
    }
}
