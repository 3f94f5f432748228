//! Reference Gröbner engine (Buchberger with full inter-reduction).
//!
//! The fan core consumes the kernel through `GroebnerEngine`; this module is
//! the shipped implementation. Output is always the *reduced* basis (monic
//! generators, no leading monomial dividing another, every generator fully
//! reduced against the rest), so bases are canonical per cone and comparable
//! as sets. A flip seeds this engine with the parent cone's basis, never with
//! the original ideal, so conversion cost tracks the basis size.

use std::collections::VecDeque;

use num_rational::BigRational;
use num_traits::One;

use super::monomial::Monomial;
use super::order::TermOrder;
use super::polynomial::Poly;
use crate::error::FanError;

/// Contract required from the ring/ideal arithmetic kernel.
pub trait GroebnerEngine {
    /// Reduced Gröbner basis of the ideal generated by `gens` under `order`.
    fn groebner_basis(
        &self,
        gens: &[Poly],
        order: &TermOrder,
        nvars: usize,
    ) -> Result<Vec<Poly>, FanError>;
}

/// Buchberger's algorithm with the coprimality criterion and a pair budget.
#[derive(Clone, Debug)]
pub struct Buchberger {
    /// Hard cap on processed S-pairs; exceeding it is `KernelDiverged`.
    pub max_pairs: usize,
}

impl Default for Buchberger {
    fn default() -> Self {
        Buchberger { max_pairs: 20_000 }
    }
}

/// Full normal form of `p` modulo `basis` under `order` (every term reduced).
pub fn reduce(p: &Poly, basis: &[Poly], order: &TermOrder) -> Poly {
    let mut work = p.clone();
    let mut rem: Vec<(Monomial, BigRational)> = Vec::new();
    'outer: while !work.is_zero() {
        let (lm, lc) = work.leading().clone();
        for g in basis {
            if g.is_zero() {
                continue;
            }
            if g.lm().divides(&lm) {
                let q = g.lm().div(&lm);
                let c = &lc / g.lc();
                work = work.sub_mul(&c, &q, g, order);
                continue 'outer;
            }
        }
        // Leading term irreducible: move it to the remainder.
        rem.push((lm, lc));
        work.terms.remove(0);
    }
    Poly { terms: rem }
}

/// S-polynomial of `f` and `g` under `order`.
fn s_poly(f: &Poly, g: &Poly, order: &TermOrder) -> Poly {
    let l = f.lm().lcm(g.lm());
    let mf = f.lm().div(&l);
    let mg = g.lm().div(&l);
    // (l / lm f) f / lc f  -  (l / lm g) g / lc g
    let cf = -(BigRational::one() / f.lc());
    let cg = BigRational::one() / g.lc();
    Poly::zero().sub_mul(&cf, &mf, f, order).sub_mul(&cg, &mg, g, order)
}

impl GroebnerEngine for Buchberger {
    fn groebner_basis(
        &self,
        gens: &[Poly],
        order: &TermOrder,
        nvars: usize,
    ) -> Result<Vec<Poly>, FanError> {
        let mut basis: Vec<Poly> = gens
            .iter()
            .filter(|g| !g.is_zero())
            .map(|g| g.resorted(order).monic())
            .collect();
        if basis.is_empty() {
            return Ok(basis);
        }
        debug_assert!(basis.iter().all(|g| g.lm().nvars() == nvars));

        let mut pairs: VecDeque<(usize, usize)> = VecDeque::new();
        for i in 0..basis.len() {
            for j in (i + 1)..basis.len() {
                pairs.push_back((i, j));
            }
        }
        let mut processed = 0usize;
        while let Some((i, j)) = pairs.pop_front() {
            processed += 1;
            if processed > self.max_pairs {
                return Err(FanError::KernelDiverged(self.max_pairs));
            }
            if basis[i].lm().is_coprime(basis[j].lm()) {
                continue;
            }
            let s = s_poly(&basis[i], &basis[j], order);
            let r = reduce(&s, &basis, order);
            if !r.is_zero() {
                let k = basis.len();
                basis.push(r.monic());
                for i in 0..k {
                    pairs.push_back((i, k));
                }
            }
        }
        Ok(inter_reduce(basis, order))
    }
}

/// Minimalize and auto-reduce to the unique reduced basis, sorted by leading
/// monomial (descending exponent lex) for determinism.
fn inter_reduce(mut basis: Vec<Poly>, order: &TermOrder) -> Vec<Poly> {
    // Minimal: drop any generator whose lm is divisible by another lm.
    let mut keep = vec![true; basis.len()];
    for i in 0..basis.len() {
        if !keep[i] {
            continue;
        }
        for j in 0..basis.len() {
            if i == j || !keep[j] {
                continue;
            }
            if basis[j].lm().divides(basis[i].lm())
                && (basis[j].lm() != basis[i].lm() || j < i)
            {
                keep[i] = false;
                break;
            }
        }
    }
    let mut reduced: Vec<Poly> = basis
        .drain(..)
        .zip(keep)
        .filter_map(|(g, k)| k.then_some(g))
        .collect();

    // Auto-reduce the tails. Minimality guarantees each leading monomial is
    // irreducible by the others, so the normal form never vanishes and the
    // outcome is the unique reduced basis regardless of visit order.
    for i in 0..reduced.len() {
        let rest: Vec<Poly> = reduced
            .iter()
            .enumerate()
            .filter_map(|(j, h)| (j != i).then(|| h.clone()))
            .collect();
        reduced[i] = reduce(&reduced[i], &rest, order).monic();
    }
    reduced.sort_by(|a, b| b.lm().0.cmp(&a.lm().0));
    reduced
}
