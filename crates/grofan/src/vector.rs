//! Exact integer vector primitives.
//!
//! Weight vectors, facet normals, and interior points are `Vec<BigInt>`;
//! all arithmetic is arbitrary precision, so overflow cannot occur. Two
//! canonical forms matter downstream:
//! - `primitive`: entries divided by their gcd (idempotent, gcd 1 after).
//! - `canonicalize`: primitive with the first nonzero entry positive; this
//!   is the form under which two independently derived normals of the same
//!   wall compare structurally equal.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;

/// Exact integer vector (weight vector, facet normal, interior point).
pub type IntVec = Vec<BigInt>;

/// Exact dot product. Lengths must agree.
pub fn dot(a: &[BigInt], b: &[BigInt]) -> BigInt {
    debug_assert_eq!(a.len(), b.len(), "dot: length mismatch");
    let mut acc = BigInt::zero();
    for (x, y) in a.iter().zip(b.iter()) {
        acc += x * y;
    }
    acc
}

/// Componentwise negation.
pub fn neg(v: &[BigInt]) -> IntVec {
    v.iter().map(|x| -x).collect()
}

/// gcd of all entries; zero for the zero vector.
pub fn gcd_all(v: &[BigInt]) -> BigInt {
    let mut g = BigInt::zero();
    for x in v {
        g = g.gcd(x);
        if g.is_one() {
            break;
        }
    }
    g
}

/// Divide by the gcd of the entries. Idempotent; the zero vector maps to
/// itself.
pub fn primitive(v: &[BigInt]) -> IntVec {
    let g = gcd_all(v);
    if g.is_zero() || g.is_one() {
        return v.to_vec();
    }
    v.iter().map(|x| x / &g).collect()
}

/// Primitive form with the first nonzero entry positive.
pub fn canonicalize(v: &[BigInt]) -> IntVec {
    let p = primitive(v);
    match p.iter().find(|x| !x.is_zero()) {
        Some(first) if first.is_negative() => neg(&p),
        _ => p,
    }
}

/// True iff `a` and `b` span the same line (either may be zero only if both
/// are). Exact cross-multiplication test, no division.
pub fn is_parallel(a: &[BigInt], b: &[BigInt]) -> bool {
    debug_assert_eq!(a.len(), b.len(), "is_parallel: length mismatch");
    for i in 0..a.len() {
        for j in (i + 1)..a.len() {
            if &a[i] * &b[j] != &a[j] * &b[i] {
                return false;
            }
        }
    }
    true
}

/// True iff the vector has both a positive and a negative entry. A wall
/// with a mixed-sign normal is exactly a wall whose hyperplane meets the
/// open positive orthant, i.e. a flippable wall.
pub fn is_mixed_sign(v: &[BigInt]) -> bool {
    v.iter().any(|x| x.is_positive()) && v.iter().any(|x| x.is_negative())
}

/// Lexicographic comparison of integer vectors (used as the deterministic
/// total order on canonicalized normals).
pub fn lex_cmp(a: &[BigInt], b: &[BigInt]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.cmp(y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Convert a rational point to its unique primitive integer representative
/// ("makeInt"): clear denominators by their lcm, then divide by the gcd.
/// The sign pattern of the input is preserved; idempotent on input that is
/// already a primitive integer vector.
pub fn rat_to_primitive_int(v: &[BigRational]) -> IntVec {
    let mut l = BigInt::one();
    for x in v {
        l = l.lcm(x.denom());
    }
    let ints: IntVec = v.iter().map(|x| x.numer() * (&l / x.denom())).collect();
    primitive(&ints)
}

/// Integer vector viewed as a rational point.
pub fn to_rational(v: &[BigInt]) -> Vec<BigRational> {
    v.iter().map(|x| BigRational::from(x.clone())).collect()
}

/// Shorthand for building an `IntVec` from machine integers (tests, configs).
pub fn ivec(entries: &[i64]) -> IntVec {
    entries.iter().map(|&x| BigInt::from(x)).collect()
}
