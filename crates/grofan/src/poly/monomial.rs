//! Exponent-vector monomials.

use std::fmt;

/// A monomial as a dense exponent vector over a fixed variable arity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Monomial(pub Vec<u32>);

impl Monomial {
    /// The constant monomial 1 in `nvars` variables.
    pub fn one(nvars: usize) -> Self {
        Monomial(vec![0; nvars])
    }

    /// Single variable `var` raised to `exp`.
    pub fn var(var: usize, exp: u32, nvars: usize) -> Self {
        let mut e = vec![0; nvars];
        e[var] = exp;
        Monomial(e)
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.0.iter().all(|&e| e == 0)
    }

    /// Total degree.
    pub fn degree(&self) -> u64 {
        self.0.iter().map(|&e| u64::from(e)).sum()
    }

    pub fn mul(&self, other: &Monomial) -> Monomial {
        Monomial(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| a + b)
                .collect(),
        )
    }

    pub fn divides(&self, other: &Monomial) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a <= b)
    }

    /// `other / self`; caller must ensure divisibility.
    pub fn div(&self, other: &Monomial) -> Monomial {
        debug_assert!(self.divides(other), "div: not divisible");
        Monomial(
            other
                .0
                .iter()
                .zip(&self.0)
                .map(|(b, a)| b - a)
                .collect(),
        )
    }

    pub fn lcm(&self, other: &Monomial) -> Monomial {
        Monomial(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| *a.max(b))
                .collect(),
        )
    }

    /// Buchberger's coprimality criterion: lcm equals the plain product.
    pub fn is_coprime(&self, other: &Monomial) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| *a == 0 || *b == 0)
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return write!(f, "1");
        }
        let mut first = true;
        for (i, &e) in self.0.iter().enumerate() {
            if e == 0 {
                continue;
            }
            if !first {
                write!(f, "*")?;
            }
            first = false;
            if e == 1 {
                write!(f, "x{i}")?;
            } else {
                write!(f, "x{i}^{e}")?;
            }
        }
        Ok(())
    }
}
