//! The counting polynomial N(T) and its two text forms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::algebra::{Expr, ExprError, Symbol};

/// A polynomial in the length variable with coefficients over the edge
/// weights.
///
/// `for_persistence` keeps every weight symbol and parses back to the same
/// value; `for_display` collapses all weights to 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountingPolynomial {
    variable: Symbol,
    expr: Expr,
}

impl CountingPolynomial {
    /// Wrap an expression in `variable`.
    pub fn new(variable: Symbol, expr: Expr) -> Self {
        Self { variable, expr }
    }

    /// Parse a persisted polynomial.
    pub fn parse(variable: Symbol, text: &str) -> Result<Self, ExprError> {
        Ok(Self::new(variable, Expr::parse(text)?))
    }

    /// The length variable.
    pub fn variable(&self) -> &Symbol {
        &self.variable
    }

    /// The full expression.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Consume into the full expression.
    pub fn into_expr(self) -> Expr {
        self.expr
    }

    /// Coefficients by power of the length variable.
    pub fn coefficients(&self) -> BTreeMap<i32, Expr> {
        self.expr.collect(&self.variable)
    }

    /// Coefficient of `variable^power`; zero when absent.
    pub fn coefficient(&self, power: i32) -> Expr {
        self.coefficients().remove(&power).unwrap_or_default()
    }

    /// Degree in the length variable; `None` for the zero polynomial.
    pub fn degree(&self) -> Option<i32> {
        self.expr.degree_in(&self.variable)
    }

    /// Weight symbols the coefficients depend on.
    pub fn weight_symbols(&self) -> Vec<Symbol> {
        self.expr
            .free_symbols()
            .into_iter()
            .filter(|s| s != &self.variable)
            .collect()
    }

    /// Substitute values for weight symbols.
    pub fn specialize(&self, weights: &BTreeMap<Symbol, Expr>) -> Result<Self, ExprError> {
        Ok(Self::new(self.variable.clone(), self.expr.substitute(weights)?))
    }

    /// The single-variable polynomial with every weight set to 1.
    pub fn display_polynomial(&self) -> Result<Self, ExprError> {
        let ones: BTreeMap<Symbol, Expr> = self
            .weight_symbols()
            .into_iter()
            .map(|s| (s, Expr::one()))
            .collect();
        self.specialize(&ones)
    }

    /// Text for screens and consoles: weights collapse to 1.
    pub fn for_display(&self) -> Result<String, ExprError> {
        Ok(self.display_polynomial()?.expr.to_string())
    }

    /// Text for `.poly` artifacts: the fully symbolic expression.
    pub fn for_persistence(&self) -> String {
        self.expr.to_string()
    }

    /// Numeric value at `length` with the given weight values.
    pub fn evaluate(&self, length: f64, weights: &BTreeMap<Symbol, f64>) -> Result<f64, ExprError> {
        let mut values = weights.clone();
        values.insert(self.variable.clone(), length);
        self.expr.evaluate(&values)
    }
}

impl fmt::Display for CountingPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CountingPolynomial {
        CountingPolynomial::parse(Symbol::new("T"), "T*(t_0 + t_1)/(t_0*t_1) + 1").unwrap()
    }

    #[test]
    fn test_display_collapses_weights() {
        assert_eq!(sample().for_display().unwrap(), "2*T + 1");
    }

    #[test]
    fn test_persistence_round_trip() {
        let n = sample();
        let text = n.for_persistence();
        assert_eq!(CountingPolynomial::parse(Symbol::new("T"), &text).unwrap(), n);
    }

    #[test]
    fn test_coefficients() {
        let n = sample();
        assert_eq!(n.degree(), Some(1));
        assert!(n.coefficient(0).is_one());
        assert!(n.coefficient(5).is_zero());
        assert_eq!(n.weight_symbols(), vec![Symbol::new("t_0"), Symbol::new("t_1")]);
    }

    #[test]
    fn test_evaluate() {
        let n = sample();
        let mut weights = BTreeMap::new();
        weights.insert(Symbol::new("t_0"), 1.0);
        weights.insert(Symbol::new("t_1"), 2.0);
        let value = n.evaluate(4.0, &weights).unwrap();
        assert!((value - 7.0).abs() < 1e-12);
        assert!(matches!(
            n.evaluate(4.0, &BTreeMap::new()),
            Err(ExprError::UnboundSymbol(_))
        ));
    }
}
