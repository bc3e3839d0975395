//! Tutte polynomial and its specializations.
//!
//! `T_G(x, y)` is computed by deletion–contraction on the multigraph:
//! a loop contributes `y`, a bridge contributes `x`, any other edge splits
//! into `T_{G−e} + T_{G/e}`. Parallel edges and loops are kept, so the
//! result is the multigraph polynomial.

use std::collections::BTreeSet;

use crate::algebra::{Expr, ExprError, Symbol};
use crate::types::Graph;

/// First Tutte variable.
pub const TUTTE_X: &str = "x";
/// Second Tutte variable.
pub const TUTTE_Y: &str = "y";

type EdgeList = Vec<(u32, u32)>;

fn connected_without(edges: &[(u32, u32)], from: u32, to: u32) -> bool {
    let mut seen = BTreeSet::from([from]);
    let mut stack = vec![from];
    while let Some(vertex) = stack.pop() {
        for &(a, b) in edges {
            let next = if a == vertex {
                b
            } else if b == vertex {
                a
            } else {
                continue;
            };
            if next == to {
                return true;
            }
            if seen.insert(next) {
                stack.push(next);
            }
        }
    }
    false
}

fn contract(edges: &[(u32, u32)], keep: u32, merge: u32) -> EdgeList {
    let relabel = |v: u32| if v == merge { keep } else { v };
    edges.iter().map(|&(a, b)| (relabel(a), relabel(b))).collect()
}

fn deletion_contraction(edges: &[(u32, u32)], x: &Expr, y: &Expr) -> Expr {
    let Some((&(a, b), rest)) = edges.split_first() else {
        return Expr::one();
    };
    if a == b {
        return y * &deletion_contraction(rest, x, y);
    }
    let contracted = contract(rest, a, b);
    if !connected_without(rest, a, b) {
        return x * &deletion_contraction(&contracted, x, y);
    }
    deletion_contraction(rest, x, y) + deletion_contraction(&contracted, x, y)
}

/// `T_G(x, y)` in the symbols `x` and `y`.
pub fn tutte_polynomial(graph: &Graph) -> Expr {
    let edges: EdgeList = graph
        .edges()
        .map(|edge| (edge.begin.get(), edge.end.get()))
        .collect();
    let x = Expr::symbol(TUTTE_X);
    let y = Expr::symbol(TUTTE_Y);
    deletion_contraction(&edges, &x, &y)
}

/// Critical-configuration polynomial `T_G(1, y)`.
pub fn critical_polynomial(graph: &Graph) -> Result<Expr, ExprError> {
    tutte_polynomial(graph).substitute_symbol(&Symbol::new(TUTTE_X), &Expr::one())
}

/// Ehrhart-type polynomial `T_G(x, 1 + 1/x)`.
pub fn ehrhart_polynomial(graph: &Graph) -> Result<Expr, ExprError> {
    let x = Expr::symbol(TUTTE_X);
    let y = Expr::one() + x.try_inverse()?;
    tutte_polynomial(graph).substitute_symbol(&Symbol::new(TUTTE_Y), &y)
}
