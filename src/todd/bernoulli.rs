//! Bernoulli numbers and the series of `z / (1 - e^{-z})`.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

/// Bernoulli numbers `B_0 ..= B_n` with `B_1 = -1/2`.
///
/// Uses `B_m = -1/(m+1) · Σ_{k<m} C(m+1, k) · B_k`.
pub fn bernoulli_numbers(n: usize) -> Vec<BigRational> {
    let mut numbers: Vec<BigRational> = Vec::with_capacity(n + 1);
    numbers.push(BigRational::one());
    for m in 1..=n {
        let mut binomial = BigInt::one();
        let mut sum = BigRational::zero();
        for (k, b) in numbers.iter().enumerate() {
            sum += b * BigRational::from_integer(binomial.clone());
            // C(m+1, k+1) from C(m+1, k)
            binomial = binomial * BigInt::from(m + 1 - k) / BigInt::from(k + 1);
        }
        numbers.push(-sum / BigRational::from_integer(BigInt::from(m + 1)));
    }
    numbers
}

/// Coefficients `c_0 ..= c_n` of `z / (1 - e^{-z}) = Σ c_j z^j`.
///
/// `c_0 = 1`, `c_1 = 1/2` and `c_j = B_j / j!` for `j ≥ 2`.
pub fn todd_series(n: usize) -> Vec<BigRational> {
    let numbers = bernoulli_numbers(n);
    let mut factorial = BigInt::one();
    numbers
        .into_iter()
        .enumerate()
        .map(|(j, b)| {
            if j > 0 {
                factorial *= BigInt::from(j);
            }
            if j == 1 {
                BigRational::new(BigInt::one(), BigInt::from(2))
            } else {
                b / BigRational::from_integer(factorial.clone())
            }
        })
        .collect()
}
