//! Cross-validation of assembled polynomials against the oracles.
//!
//! The wavefront simulator counts points exactly; N(T) is the smooth
//! approximation of that count, so away from a single edge they agree up to
//! a bounded error. The Todd polynomials are checked against direct
//! lattice-point counts.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;

use pc_polynomial::algebra::Symbol;
use pc_polynomial::families::{bamboo, loop_with_tail, multiedge, single_edge, triangle, triangle_with_tail};
use pc_polynomial::io::graph_file::POSITIONAL_PREFIX;
use pc_polynomial::{
    build_rk, lattice_count, Expr, Graph, OracleError, PolynomialAssembler, VertexId, WavefrontSimulator,
};

/// Largest accepted |N(T) − simulated count|.
const TOLERANCE: f64 = 1.5;

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Rationally independent lengths `1, √2, √3, √5, √7`.
fn generic_lengths(edges: usize) -> BTreeMap<Symbol, f64> {
    [1.0_f64, 2.0, 3.0, 5.0, 7.0]
        .iter()
        .take(edges)
        .enumerate()
        .map(|(i, x)| (Symbol::indexed(POSITIONAL_PREFIX, i), x.sqrt()))
        .collect()
}

fn compare(name: &str, graph: &Graph, horizon: f64) -> (f64, usize) {
    let lengths = generic_lengths(graph.num_edges());
    let poly = PolynomialAssembler::default().build(graph).unwrap();
    let predicted = poly.evaluate(horizon, &lengths).unwrap();
    let simulated = WavefrontSimulator::new()
        .count_at(graph, VertexId::new(0), &lengths, horizon)
        .unwrap();
    let diff = predicted - simulated as f64;
    assert!(
        diff.abs() < TOLERANCE,
        "{name} at T={horizon}: N={predicted:.3}, simulated={simulated}, diff={diff:.3}"
    );
    (predicted, simulated)
}

fn rational(n: i64, d: i64) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}

// ─────────────────────────────────────────────────────────────────────────────
// Polynomial vs Simulation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_single_edge_exact() {
    let (_, _, g) = single_edge();
    for horizon in [0.5, 1.0, 2.0, 5.0] {
        let (predicted, simulated) = compare("single", &g, horizon);
        assert_eq!(simulated, 1);
        assert!((predicted - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_generic_lengths_agree() {
    let cases = [
        ("multiedge:2", multiedge(2).2),
        ("loop-tail", loop_with_tail().2),
        ("bamboo:2", bamboo(2).2),
        ("triangle", triangle().2),
        ("multiedge:4", multiedge(4).2),
        ("triangle-tail", triangle_with_tail().2),
    ];
    for (name, graph) in &cases {
        for horizon in [20.0, 30.0] {
            compare(name, graph, horizon);
        }
    }
}

#[test]
fn test_known_simulation_counts() {
    let sim = WavefrontSimulator::new();
    let at = |graph: &Graph, horizon: f64| {
        sim.count_at(graph, VertexId::new(0), &generic_lengths(graph.num_edges()), horizon)
            .unwrap()
    };
    assert_eq!(at(&multiedge(4).2, 20.0), 2155);
    assert_eq!(at(&triangle_with_tail().2, 30.0), 3833);
    assert_eq!(at(&triangle().2, 10.0), 54);
    assert_eq!(at(&bamboo(2).2, 5.0), 5);
}

#[test]
fn test_unit_triangle_merges_points() {
    // Equal lengths make wavefronts collide and merge, so the count falls
    // far below N(10) = 89.75.
    let (_, _, g) = triangle();
    let ones: BTreeMap<Symbol, f64> = (0..3).map(|i| (Symbol::indexed(POSITIONAL_PREFIX, i), 1.0)).collect();
    let count = WavefrontSimulator::new().count_at(&g, VertexId::new(0), &ones, 10.0).unwrap();
    assert_eq!(count, 6);
}

#[test]
fn test_simulator_rejects_bad_lengths() {
    let (_, _, g) = bamboo(2);
    let mut lengths = generic_lengths(2);
    lengths.insert(Symbol::indexed(POSITIONAL_PREFIX, 1), 0.0);
    let err = WavefrontSimulator::new().count_at(&g, VertexId::new(0), &lengths, 3.0);
    assert!(matches!(err, Err(OracleError::NonPositiveLength { .. })));

    let err = WavefrontSimulator::new().count_at(&g, VertexId::new(0), &BTreeMap::new(), 3.0);
    assert!(matches!(err, Err(OracleError::Algebra(_))));

    let err = WavefrontSimulator::new().count_at(&g, VertexId::new(9), &generic_lengths(2), 3.0);
    assert!(matches!(err, Err(OracleError::SourceNotFound(_))));
}

// ─────────────────────────────────────────────────────────────────────────────
// Todd Polynomials vs Lattice Counts
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_r1_matches_lattice_count() {
    // At multiples of the weight the half-point rule makes R_1 exact.
    let w = rational(3, 2);
    let rk = build_rk(1, &[Expr::constant(w.clone())]).unwrap();
    for (n, d) in [(0, 1), (3, 2), (3, 1), (6, 1), (27, 2)] {
        let lambda = rational(n, d);
        let expected = lattice_count(&lambda, &[w.clone()]).unwrap();
        let value = rk.evaluate(&Expr::constant(lambda)).as_constant().unwrap();
        assert_eq!(value, expected, "λ = {n}/{d}");
    }
}

#[test]
fn test_r2_tracks_lattice_count() {
    let weights = [rational(1, 1), rational(3, 2)];
    let rk = build_rk(2, &weights.iter().cloned().map(Expr::constant).collect::<Vec<_>>()).unwrap();
    for n in [10, 25, 40] {
        let lambda = rational(n, 1);
        let exact = lattice_count(&lambda, &weights).unwrap();
        let smooth = rk.evaluate(&Expr::constant(lambda)).as_constant().unwrap();
        let gap = (smooth - exact).abs();
        assert!(gap <= rational(1, 1), "λ = {n}: gap {gap}");
    }
}
