//! Term orders as weight-row sequences with a lexicographic tail.
//!
//! A `TermOrder` compares two monomials by the exact dot products of their
//! exponent vectors with a sequence of integer weight rows, falling back to
//! plain lex when all rows tie. With a strictly positive first row the order
//! is global (every monomial exceeds 1), which is what both the per-cone
//! orders (row = cone interior point) and the flip orders (rows = wall
//! interior point, then outward normal) guarantee by construction.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::Zero;

use super::monomial::Monomial;
use crate::vector::IntVec;

/// A deterministic total order over monomials of a fixed arity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermOrder {
    rows: Vec<IntVec>,
}

impl TermOrder {
    /// Pure lexicographic order (x0 > x1 > ...).
    pub fn lex() -> Self {
        TermOrder { rows: Vec::new() }
    }

    /// Single weight row, lex tie-break.
    pub fn weight(w: IntVec) -> Self {
        TermOrder { rows: vec![w] }
    }

    /// Two weight rows compared in sequence, lex tie-break. Used by flips:
    /// first the wall interior point, then the outward wall normal.
    pub fn weight_then(w1: IntVec, w2: IntVec) -> Self {
        TermOrder { rows: vec![w1, w2] }
    }

    pub fn from_rows(rows: Vec<IntVec>) -> Self {
        TermOrder { rows }
    }

    pub fn rows(&self) -> &[IntVec] {
        &self.rows
    }

    pub fn compare(&self, a: &Monomial, b: &Monomial) -> Ordering {
        debug_assert_eq!(a.nvars(), b.nvars(), "compare: arity mismatch");
        for row in &self.rows {
            match weight_of(row, a).cmp(&weight_of(row, b)) {
                Ordering::Equal => {}
                other => return other,
            }
        }
        // Lex tail: first differing exponent decides, larger wins.
        for (ea, eb) in a.0.iter().zip(&b.0) {
            match ea.cmp(eb) {
                Ordering::Equal => {}
                other => return other,
            }
        }
        Ordering::Equal
    }
}

/// Exact weight of a monomial under one row.
fn weight_of(row: &[BigInt], m: &Monomial) -> BigInt {
    debug_assert_eq!(row.len(), m.nvars(), "weight_of: arity mismatch");
    let mut acc = BigInt::zero();
    for (w, &e) in row.iter().zip(&m.0) {
        if e != 0 {
            acc += w * BigInt::from(e);
        }
    }
    acc
}
