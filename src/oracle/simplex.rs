//! Naive lattice-point count in a weighted simplex.
//!
//! Counts `k ∈ ℕⁿ` with `Σ kᵢwᵢ < λ`, and adds one half for every point
//! exactly on the boundary `Σ kᵢwᵢ = λ`. This is the quantity `R_n(λ; w)`
//! approximates; for a single weight the two agree exactly.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::OracleError;

/// Lattice count with the half-point tie rule, in exact arithmetic.
pub fn lattice_count(lambda: &BigRational, weights: &[BigRational]) -> Result<BigRational, OracleError> {
    if let Some(index) = weights.iter().position(|w| !w.is_positive()) {
        return Err(OracleError::NonPositiveWeight { index });
    }
    let mut strict = BigInt::zero();
    let mut ties = BigInt::zero();
    count_below(lambda.clone(), weights, &mut strict, &mut ties);
    Ok(BigRational::from_integer(strict) + BigRational::new(ties, BigInt::from(2)))
}

fn count_below(budget: BigRational, weights: &[BigRational], strict: &mut BigInt, ties: &mut BigInt) {
    let Some((weight, rest)) = weights.split_first() else {
        if budget.is_positive() {
            *strict += 1u32;
        } else if budget.is_zero() {
            *ties += 1u32;
        }
        return;
    };
    let mut remaining = budget;
    while !remaining.is_negative() {
        count_below(remaining.clone(), rest, strict, ties);
        remaining -= weight;
    }
}
