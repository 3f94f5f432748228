//! Exact Fourier-Motzkin elimination over the rationals.
//!
//! Purpose
//! - Decide feasibility of systems `A x >= b` (entries `BigRational`) and
//!   produce a feasible sample point by back-substitution.
//! - This powers both services of the polyhedral adapter: irredundancy of
//!   cone inequalities and certified interior points.
//!
//! Classic FM: partition constraints on the eliminated variable into lower
//! and upper bounds, emit one combination per (lower, upper) pair, and keep
//! the rest. Exact duplicates are subsumed after gcd-style normalization so
//! the quadratic blowup stays tame at fan dimensions.

use std::collections::HashSet;

use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// One linear constraint `coeffs . x >= rhs`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub coeffs: Vec<BigRational>,
    pub rhs: BigRational,
}

impl Constraint {
    pub fn new(coeffs: Vec<BigRational>, rhs: BigRational) -> Self {
        Constraint { coeffs, rhs }
    }

    fn is_constant(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    /// Constant row that no point satisfies (`0 >= rhs` with `rhs > 0`).
    fn is_contradiction(&self) -> bool {
        self.is_constant() && self.rhs.is_positive()
    }

    /// Scale so the first nonzero coefficient has absolute value one; the
    /// canonical representative under positive scaling, used for subsumption.
    fn normalized(&self) -> Constraint {
        match self.coeffs.iter().find(|c| !c.is_zero()) {
            Some(first) => {
                let s = first.abs();
                Constraint {
                    coeffs: self.coeffs.iter().map(|c| c / &s).collect(),
                    rhs: &self.rhs / &s,
                }
            }
            None => self.clone(),
        }
    }
}

/// Outcome of one elimination pass: constraints free of the variable, plus
/// the bounds retained for back-substitution.
struct Level {
    var: usize,
    bounds: Vec<Constraint>,
}

/// Feasibility of `rows` in `nvars` variables; on success, a sample point.
///
/// The sample sits at the midpoint of each residual interval (bound plus or
/// minus one when one-sided), so strict systems shifted to `>= 1` get points
/// safely away from every active hyperplane.
pub fn feasible_point(nvars: usize, rows: &[Constraint]) -> Option<Vec<BigRational>> {
    let mut cur = dedup(rows.iter().map(Constraint::normalized));
    if cur.iter().any(Constraint::is_contradiction) {
        return None;
    }
    cur.retain(|c| !c.is_constant());

    let mut levels: Vec<Level> = Vec::with_capacity(nvars);
    for var in (0..nvars).rev() {
        let (bounds, mut rest): (Vec<_>, Vec<_>) =
            cur.into_iter().partition(|c| !c.coeffs[var].is_zero());
        if var > 0 {
            // Combine each (lower, upper) pair to eliminate `var`.
            for lo in bounds.iter().filter(|c| c.coeffs[var].is_positive()) {
                for hi in bounds.iter().filter(|c| c.coeffs[var].is_negative()) {
                    let a = &lo.coeffs[var];
                    let b = -&hi.coeffs[var];
                    let mut coeffs = Vec::with_capacity(nvars);
                    for j in 0..nvars {
                        coeffs.push(&lo.coeffs[j] * &b + &hi.coeffs[j] * a);
                    }
                    let rhs = &lo.rhs * &b + &hi.rhs * a;
                    let c = Constraint::new(coeffs, rhs).normalized();
                    if c.is_contradiction() {
                        return None;
                    }
                    if !c.is_constant() {
                        rest.push(c);
                    }
                }
            }
            rest = dedup(rest.into_iter());
        }
        levels.push(Level { var, bounds });
        cur = rest;
    }

    // Back-substitute from the innermost variable outwards.
    let mut point = vec![BigRational::zero(); nvars];
    for level in levels.iter().rev() {
        let var = level.var;
        let mut lower: Option<BigRational> = None;
        let mut upper: Option<BigRational> = None;
        for c in &level.bounds {
            let mut rest = c.rhs.clone();
            for j in 0..nvars {
                if j != var {
                    rest -= &c.coeffs[j] * &point[j];
                }
            }
            let bound = rest / &c.coeffs[var];
            if c.coeffs[var].is_positive() {
                lower = Some(match lower {
                    Some(l) if l >= bound => l,
                    _ => bound,
                });
            } else {
                upper = Some(match upper {
                    Some(u) if u <= bound => u,
                    _ => bound,
                });
            }
        }
        point[var] = match (lower, upper) {
            (Some(l), Some(u)) => {
                if l > u {
                    return None;
                }
                (&l + &u) / BigRational::from_integer(2.into())
            }
            (Some(l), None) => l + BigRational::one(),
            (None, Some(u)) => u - BigRational::one(),
            (None, None) => BigRational::zero(),
        };
    }
    Some(point)
}

fn dedup<I: Iterator<Item = Constraint>>(rows: I) -> Vec<Constraint> {
    let mut seen: HashSet<Constraint> = HashSet::new();
    let mut out = Vec::new();
    for c in rows {
        if seen.insert(c.clone()) {
            out.push(c);
        }
    }
    out
}
