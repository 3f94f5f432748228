//! Polyhedral adapter: the contract the fan core needs from an inequality
//! solver, plus the shipped Fourier-Motzkin implementation.
//!
//! A cone is handed around as its inner-normal rows `{x : rows . x >= 0}`.
//! The adapter answers two questions exactly: which rows are irredundant
//! facets, and where is a certified strictly-feasible point. Degenerate
//! systems surface as `FanError::DegenerateCone`, never as wrong answers.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::fm::{feasible_point, Constraint};
use crate::error::FanError;
use crate::poly::Poly;
use crate::vector::{primitive, IntVec};

/// External-solver contract for facet enumeration and interior points.
pub trait PolyhedralSolver {
    /// Indices of the rows that are essential (facet-defining) for the cone
    /// `{x : rows . x >= 0}`. Row `i` is essential iff some point satisfies
    /// all other rows while violating row `i` by a full unit.
    fn irredundant_rows(&self, rows: &[IntVec]) -> Result<Vec<usize>, FanError>;

    /// A certified point with `geq_one . x >= 1` for every listed row and
    /// `eq_zero . x = 0` for every equality row. Infeasible systems are
    /// degenerate cones.
    fn strict_point(
        &self,
        nvars: usize,
        geq_one: &[IntVec],
        eq_zero: &[IntVec],
    ) -> Result<Vec<BigRational>, FanError>;
}

/// The shipped exact solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct FourierMotzkin;

fn row_constraint(row: &[BigInt], rhs: BigRational) -> Constraint {
    Constraint::new(
        row.iter().map(|x| BigRational::from(x.clone())).collect(),
        rhs,
    )
}

impl PolyhedralSolver for FourierMotzkin {
    fn irredundant_rows(&self, rows: &[IntVec]) -> Result<Vec<usize>, FanError> {
        let nvars = match rows.first() {
            Some(r) => r.len(),
            None => return Ok(Vec::new()),
        };
        let mut keep = Vec::new();
        for i in 0..rows.len() {
            let mut system: Vec<Constraint> = Vec::with_capacity(rows.len());
            for (j, row) in rows.iter().enumerate() {
                if j != i {
                    system.push(row_constraint(row, BigRational::zero()));
                }
            }
            // Violate row i by a unit: (-row_i) . x >= 1.
            let neg: IntVec = rows[i].iter().map(|x| -x).collect();
            system.push(row_constraint(&neg, BigRational::one()));
            if feasible_point(nvars, &system).is_some() {
                keep.push(i);
            }
        }
        Ok(keep)
    }

    fn strict_point(
        &self,
        nvars: usize,
        geq_one: &[IntVec],
        eq_zero: &[IntVec],
    ) -> Result<Vec<BigRational>, FanError> {
        let mut system: Vec<Constraint> = Vec::with_capacity(geq_one.len() + 2 * eq_zero.len());
        for row in geq_one {
            system.push(row_constraint(row, BigRational::one()));
        }
        for row in eq_zero {
            system.push(row_constraint(row, BigRational::zero()));
            let neg: IntVec = row.iter().map(|x| -x).collect();
            system.push(row_constraint(&neg, BigRational::zero()));
        }
        feasible_point(nvars, &system).ok_or_else(|| {
            FanError::DegenerateCone(format!(
                "no strictly feasible point ({} inequalities, {} equalities, {} vars)",
                geq_one.len(),
                eq_zero.len(),
                nvars
            ))
        })
    }
}

/// Candidate inequality rows of a cone from its (reduced, order-sorted)
/// basis: one row `lm - t` per trailing term `t` of each generator, in
/// primitive form, exact duplicates coalesced. These are the inner normals
/// of the region where every leading term stays leading.
pub fn facet_candidates(basis: &[Poly]) -> Vec<IntVec> {
    let mut out: Vec<IntVec> = Vec::new();
    for g in basis {
        if g.is_zero() {
            continue;
        }
        let lead = &g.lm().0;
        for (mon, _) in g.terms.iter().skip(1) {
            let row: IntVec = lead
                .iter()
                .zip(&mon.0)
                .map(|(a, b)| BigInt::from(*a) - BigInt::from(*b))
                .collect();
            let row = primitive(&row);
            if !out.contains(&row) {
                out.push(row);
            }
        }
    }
    out
}
