//! Exact multivariate Laurent polynomials over the rationals.
//!
//! Every quantity the counting pipeline touches lives in this ring: edge
//! weights are single-term values, Todd polynomials carry `1/∏wᵢ`, and the
//! λ-substitutions are polynomial. Because the representation is canonical
//! (sorted terms, no zero coefficients, no zero exponents), structural
//! equality is exact symbolic equality and no separate simplification pass
//! exists.

use std::collections::{BTreeMap, BTreeSet};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use super::symbol::Symbol;

/// Error type for algebra operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    /// Inverse of the zero value was requested.
    #[error("Division by zero")]
    DivisionByZero,
    /// Inverse of a value with more than one term was requested.
    #[error("Expression has no inverse in the Laurent ring: {0}")]
    NotInvertible(String),
    /// Numeric evaluation met a symbol without a value.
    #[error("No value bound for symbol: {0}")]
    UnboundSymbol(Symbol),
    /// Malformed expression text.
    #[error("Parse error at offset {offset}: {message}")]
    Parse {
        /// Byte offset into the input.
        offset: usize,
        /// What went wrong.
        message: String,
    },
    /// An exponent was not an integer constant.
    #[error("Exponent must be an integer constant, got: {0}")]
    NonIntegerExponent(String),
    /// A product or inverse pushed an exponent outside the `i32` range.
    #[error("Exponent of {0} out of range")]
    ExponentOverflow(Symbol),
}

/// Product of symbols raised to non-zero integer powers.
///
/// The empty monomial is the unit `1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeMap<Symbol, i32>);

impl Monomial {
    /// The unit monomial.
    pub fn one() -> Self {
        Self::default()
    }

    /// A single symbol to the first power.
    pub fn var(symbol: Symbol) -> Self {
        Self::power(symbol, 1)
    }

    /// A single symbol to the given power.
    pub fn power(symbol: Symbol, exponent: i32) -> Self {
        let mut factors = BTreeMap::new();
        if exponent != 0 {
            factors.insert(symbol, exponent);
        }
        Self(factors)
    }

    /// Whether this is the unit monomial.
    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    /// Exponent of `symbol` (0 if absent).
    pub fn exponent(&self, symbol: &Symbol) -> i32 {
        self.0.get(symbol).copied().unwrap_or(0)
    }

    /// Iterate over `(symbol, exponent)` factors in symbol order.
    pub fn factors(&self) -> impl Iterator<Item = (&Symbol, i32)> + '_ {
        self.0.iter().map(|(s, e)| (s, *e))
    }

    fn times(&self, other: &Monomial) -> Result<Monomial, ExprError> {
        let mut factors = self.0.clone();
        for (symbol, exponent) in &other.0 {
            let entry = factors.entry(symbol.clone()).or_insert(0);
            *entry = entry
                .checked_add(*exponent)
                .ok_or_else(|| ExprError::ExponentOverflow(symbol.clone()))?;
            if *entry == 0 {
                factors.remove(symbol);
            }
        }
        Ok(Monomial(factors))
    }

    fn inverse(&self) -> Result<Monomial, ExprError> {
        self.0
            .iter()
            .map(|(s, e)| {
                e.checked_neg()
                    .map(|negated| (s.clone(), negated))
                    .ok_or_else(|| ExprError::ExponentOverflow(s.clone()))
            })
            .collect::<Result<_, _>>()
            .map(Monomial)
    }

    fn without(&self, symbol: &Symbol) -> Monomial {
        let mut factors = self.0.clone();
        factors.remove(symbol);
        Monomial(factors)
    }
}

/// An exact Laurent polynomial with rational coefficients.
///
/// This is the single scalar type of the crate: edge weights, Todd
/// polynomial coefficients and the final counting polynomial are all `Expr`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Expr {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Expr {
    /// The zero value.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The unit value.
    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    /// A rational constant.
    pub fn constant(value: BigRational) -> Self {
        Self::term(value, Monomial::one())
    }

    /// An integer constant.
    pub fn integer(value: i64) -> Self {
        Self::constant(BigRational::from_integer(BigInt::from(value)))
    }

    /// A single symbol.
    pub fn symbol(symbol: impl Into<Symbol>) -> Self {
        Self::term(BigRational::one(), Monomial::var(symbol.into()))
    }

    /// A single term `coefficient * monomial`.
    pub fn term(coefficient: BigRational, monomial: Monomial) -> Self {
        let mut expr = Self::zero();
        expr.add_term(monomial, coefficient);
        expr
    }

    /// Whether this is the zero value.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether this is the unit value.
    pub fn is_one(&self) -> bool {
        self.as_constant().is_some_and(|c| c.is_one())
    }

    /// Number of non-zero terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Iterate over `(monomial, coefficient)` pairs in ascending monomial order.
    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (&Monomial, &BigRational)> + '_ {
        self.terms.iter()
    }

    /// The value as a rational constant, if it has no free symbols.
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.terms.len() {
            0 => Some(BigRational::zero()),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(m, _)| m.is_one())
                .map(|(_, c)| c.clone()),
            _ => None,
        }
    }

    /// Multiply every coefficient by `factor`.
    pub fn scale(&self, factor: &BigRational) -> Expr {
        if factor.is_zero() {
            return Expr::zero();
        }
        Expr {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), c * factor))
                .collect(),
        }
    }

    /// Multiply by an integer.
    pub fn scale_int(&self, factor: i64) -> Expr {
        self.scale(&BigRational::from_integer(BigInt::from(factor)))
    }

    /// Product that reports exponent overflow instead of panicking.
    pub fn checked_mul(&self, rhs: &Expr) -> Result<Expr, ExprError> {
        let mut out = Expr::zero();
        for (lm, lc) in &self.terms {
            for (rm, rc) in &rhs.terms {
                out.add_term(lm.times(rm)?, lc * rc);
            }
        }
        Ok(out)
    }

    /// Raise to a non-negative power.
    ///
    /// # Panics
    ///
    /// If an exponent leaves the `i32` range; see [`Expr::checked_pow`].
    pub fn pow(&self, exponent: u32) -> Expr {
        match self.checked_pow(exponent) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    /// Raise to a non-negative power, reporting exponent overflow.
    pub fn checked_pow(&self, exponent: u32) -> Result<Expr, ExprError> {
        let mut result = Expr::one();
        let mut base = self.clone();
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.checked_mul(&base)?;
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.checked_mul(&base)?;
            }
        }
        Ok(result)
    }

    /// Raise to an integer power; negative powers need an invertible value.
    pub fn powi(&self, exponent: i32) -> Result<Expr, ExprError> {
        if exponent >= 0 {
            self.checked_pow(exponent.unsigned_abs())
        } else {
            self.try_inverse()?.checked_pow(exponent.unsigned_abs())
        }
    }

    /// Multiplicative inverse.
    ///
    /// Only single-term values are units of the Laurent ring.
    pub fn try_inverse(&self) -> Result<Expr, ExprError> {
        let mut terms = self.terms.iter();
        match (terms.next(), terms.next()) {
            (None, _) => Err(ExprError::DivisionByZero),
            (Some((monomial, coefficient)), None) => {
                Ok(Expr::term(coefficient.recip(), monomial.inverse()?))
            }
            (Some(_), Some(_)) => Err(ExprError::NotInvertible(self.to_string())),
        }
    }

    /// Divide by a single-term value.
    pub fn checked_div(&self, divisor: &Expr) -> Result<Expr, ExprError> {
        self.checked_mul(&divisor.try_inverse()?)
    }

    /// Substitute several symbols simultaneously.
    ///
    /// Symbols appearing with negative exponents need an invertible value.
    pub fn substitute(&self, bindings: &BTreeMap<Symbol, Expr>) -> Result<Expr, ExprError> {
        if bindings.is_empty() {
            return Ok(self.clone());
        }
        let mut inverses: BTreeMap<&Symbol, Expr> = BTreeMap::new();
        let mut result = Expr::zero();
        for (monomial, coefficient) in &self.terms {
            let mut kept = Monomial::one();
            let mut product = Expr::constant(coefficient.clone());
            for (symbol, exponent) in monomial.factors() {
                match bindings.get(symbol) {
                    Some(value) if exponent > 0 => {
                        product = product.checked_mul(&value.checked_pow(exponent.unsigned_abs())?)?;
                    }
                    Some(value) => {
                        if !inverses.contains_key(symbol) {
                            inverses.insert(symbol, value.try_inverse()?);
                        }
                        let inverse = &inverses[symbol];
                        product = product.checked_mul(&inverse.checked_pow(exponent.unsigned_abs())?)?;
                    }
                    None => kept = kept.times(&Monomial::power(symbol.clone(), exponent))?,
                }
            }
            result += product.checked_mul(&Expr::term(BigRational::one(), kept))?;
        }
        Ok(result)
    }

    /// Substitute a single symbol.
    pub fn substitute_symbol(&self, symbol: &Symbol, value: &Expr) -> Result<Expr, ExprError> {
        let mut bindings = BTreeMap::new();
        bindings.insert(symbol.clone(), value.clone());
        self.substitute(&bindings)
    }

    /// All symbols with a non-zero exponent in some term.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        self.terms
            .keys()
            .flat_map(|m| m.factors().map(|(s, _)| s.clone()))
            .collect()
    }

    /// Highest exponent of `symbol`; `None` for the zero value.
    pub fn degree_in(&self, symbol: &Symbol) -> Option<i32> {
        self.terms.keys().map(|m| m.exponent(symbol)).max()
    }

    /// Lowest exponent of `symbol`; `None` for the zero value.
    pub fn low_degree_in(&self, symbol: &Symbol) -> Option<i32> {
        self.terms.keys().map(|m| m.exponent(symbol)).min()
    }

    /// Coefficients of the powers of `symbol`.
    pub fn collect(&self, symbol: &Symbol) -> BTreeMap<i32, Expr> {
        let mut out: BTreeMap<i32, Expr> = BTreeMap::new();
        for (monomial, coefficient) in &self.terms {
            out.entry(monomial.exponent(symbol))
                .or_default()
                .add_term(monomial.without(symbol), coefficient.clone());
        }
        out
    }

    /// Evaluate numerically with every free symbol bound.
    pub fn evaluate(&self, values: &BTreeMap<Symbol, f64>) -> Result<f64, ExprError> {
        let mut total = 0.0;
        for (monomial, coefficient) in &self.terms {
            let mut term = ratio_to_f64(coefficient);
            for (symbol, exponent) in monomial.factors() {
                let value = values
                    .get(symbol)
                    .ok_or_else(|| ExprError::UnboundSymbol(symbol.clone()))?;
                term *= value.powi(exponent);
            }
            total += term;
        }
        Ok(total)
    }

    fn add_term(&mut self, monomial: Monomial, coefficient: BigRational) {
        if coefficient.is_zero() {
            return;
        }
        match self.terms.entry(monomial) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(coefficient);
            }
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                *slot.get_mut() += coefficient;
                if slot.get().is_zero() {
                    slot.remove();
                }
            }
        }
    }
}

/// Lossy conversion used only for numeric evaluation.
pub(crate) fn ratio_to_f64(value: &BigRational) -> f64 {
    let numer = value.numer().to_f64().unwrap_or(f64::NAN);
    let denom = value.denom().to_f64().unwrap_or(f64::NAN);
    numer / denom
}

impl From<BigRational> for Expr {
    fn from(value: BigRational) -> Self {
        Self::constant(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Self::symbol(symbol)
    }
}

impl From<&Symbol> for Expr {
    fn from(symbol: &Symbol) -> Self {
        Self::symbol(symbol.clone())
    }
}

impl AddAssign<&Expr> for Expr {
    fn add_assign(&mut self, rhs: &Expr) {
        for (monomial, coefficient) in &rhs.terms {
            self.add_term(monomial.clone(), coefficient.clone());
        }
    }
}

impl AddAssign for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        for (monomial, coefficient) in rhs.terms {
            self.add_term(monomial, coefficient);
        }
    }
}

impl SubAssign<&Expr> for Expr {
    fn sub_assign(&mut self, rhs: &Expr) {
        for (monomial, coefficient) in &rhs.terms {
            self.add_term(monomial.clone(), -coefficient);
        }
    }
}

impl SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Expr) {
        for (monomial, coefficient) in rhs.terms {
            self.add_term(monomial, -coefficient);
        }
    }
}

impl Add<&Expr> for &Expr {
    type Output = Expr;

    fn add(self, rhs: &Expr) -> Expr {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Add<&Expr> for Expr {
    type Output = Expr;

    fn add(mut self, rhs: &Expr) -> Expr {
        self += rhs;
        self
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(mut self, rhs: Expr) -> Expr {
        self += rhs;
        self
    }
}

impl Sub<&Expr> for &Expr {
    type Output = Expr;

    fn sub(self, rhs: &Expr) -> Expr {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl Sub<&Expr> for Expr {
    type Output = Expr;

    fn sub(mut self, rhs: &Expr) -> Expr {
        self -= rhs;
        self
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(mut self, rhs: Expr) -> Expr {
        self -= rhs;
        self
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        -&self
    }
}

impl Mul<&Expr> for &Expr {
    type Output = Expr;

    /// # Panics
    ///
    /// If an exponent leaves the `i32` range; see [`Expr::checked_mul`].
    fn mul(self, rhs: &Expr) -> Expr {
        match self.checked_mul(rhs) {
            Ok(product) => product,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Mul<&Expr> for Expr {
    type Output = Expr;

    fn mul(self, rhs: &Expr) -> Expr {
        &self * rhs
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        &self * &rhs
    }
}

impl MulAssign<&Expr> for Expr {
    fn mul_assign(&mut self, rhs: &Expr) {
        *self = &*self * rhs;
    }
}

impl Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Self {
        iter.fold(Expr::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Expr> for Expr {
    fn sum<I: Iterator<Item = &'a Expr>>(iter: I) -> Self {
        iter.fold(Expr::zero(), |acc, x| acc + x)
    }
}
