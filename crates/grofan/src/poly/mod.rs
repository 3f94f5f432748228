//! Minimal exact polynomial kernel (the ring/ideal collaborator).
//!
//! Purpose
//! - Provide exactly what fan enumeration needs: monomials, weight-matrix
//!   term orders, sparse rational polynomials, and a reduced-Gröbner-basis
//!   primitive behind the `GroebnerEngine` trait.
//! - Anything beyond that contract (general polynomial arithmetic, script
//!   parsing) is out of scope.

pub mod buchberger;
pub mod monomial;
pub mod order;
pub mod polynomial;

pub use buchberger::{reduce, Buchberger, GroebnerEngine};
pub use monomial::Monomial;
pub use order::TermOrder;
pub use polynomial::{Ideal, Poly, Term};
