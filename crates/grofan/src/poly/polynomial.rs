//! Sparse polynomials over the rationals.
//!
//! Terms are kept sorted strictly descending under the owning context's
//! `TermOrder`; the leading term is `terms[0]`. All coefficient arithmetic
//! is exact (`BigRational`).

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use num_rational::BigRational;
use num_traits::{One, Zero};

use super::monomial::Monomial;
use super::order::TermOrder;

/// One term: coefficient times monomial.
pub type Term = (Monomial, BigRational);

/// Sparse polynomial; terms sorted descending under a `TermOrder`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly {
    pub terms: Vec<Term>,
}

impl Poly {
    pub fn zero() -> Self {
        Poly { terms: Vec::new() }
    }

    /// Build from unsorted terms: sort under `order`, merge duplicates,
    /// drop zero coefficients.
    pub fn from_terms(mut terms: Vec<Term>, order: &TermOrder) -> Self {
        terms.sort_by(|a, b| order.compare(&b.0, &a.0));
        let mut out: Vec<Term> = Vec::with_capacity(terms.len());
        for (m, c) in terms {
            if let Some(last) = out.last_mut() {
                if last.0 == m {
                    last.1 += c;
                    if last.1.is_zero() {
                        out.pop();
                    }
                    continue;
                }
            }
            if !c.is_zero() {
                out.push((m, c));
            }
        }
        Poly { terms: out }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Leading term; polynomial must be nonzero.
    #[inline]
    pub fn leading(&self) -> &Term {
        &self.terms[0]
    }

    #[inline]
    pub fn lm(&self) -> &Monomial {
        &self.terms[0].0
    }

    #[inline]
    pub fn lc(&self) -> &BigRational {
        &self.terms[0].1
    }

    /// Re-sort the terms under a different order (same term set).
    pub fn resorted(&self, order: &TermOrder) -> Poly {
        Poly::from_terms(self.terms.clone(), order)
    }

    /// Divide through by the leading coefficient.
    pub fn monic(&self) -> Poly {
        if self.is_zero() || self.lc().is_one() {
            return self.clone();
        }
        let lc = self.lc().clone();
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), c / &lc))
                .collect(),
        }
    }

    /// `self - c * m * g`, merging sorted term streams under `order`.
    pub fn sub_mul(&self, c: &BigRational, m: &Monomial, g: &Poly, order: &TermOrder) -> Poly {
        let mut out: Vec<Term> = Vec::with_capacity(self.terms.len() + g.terms.len());
        let mut i = 0;
        let mut j = 0;
        while i < self.terms.len() && j < g.terms.len() {
            let gm = g.terms[j].0.mul(m);
            match order.compare(&self.terms[i].0, &gm) {
                Ordering::Greater => {
                    out.push(self.terms[i].clone());
                    i += 1;
                }
                Ordering::Less => {
                    out.push((gm, -(c * &g.terms[j].1)));
                    j += 1;
                }
                Ordering::Equal => {
                    let coeff = &self.terms[i].1 - c * &g.terms[j].1;
                    if !coeff.is_zero() {
                        out.push((gm, coeff));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        while i < self.terms.len() {
            out.push(self.terms[i].clone());
            i += 1;
        }
        while j < g.terms.len() {
            out.push((g.terms[j].0.mul(m), -(c * &g.terms[j].1)));
            j += 1;
        }
        Poly { terms: out }
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (k, (m, c)) in self.terms.iter().enumerate() {
            if k > 0 {
                write!(f, " + ")?;
            }
            if m.is_one() {
                write!(f, "{c}")?;
            } else if c.is_one() {
                write!(f, "{m}")?;
            } else {
                write!(f, "{c}*{m}")?;
            }
        }
        Ok(())
    }
}

/// An ideal: an immutable, shared generator list.
#[derive(Clone, Debug)]
pub struct Ideal {
    pub nvars: usize,
    gens: Vec<Poly>,
}

impl Ideal {
    pub fn new(nvars: usize, gens: Vec<Poly>) -> Arc<Self> {
        Arc::new(Ideal { nvars, gens })
    }

    pub fn generators(&self) -> &[Poly] {
        &self.gens
    }
}
