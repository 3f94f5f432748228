//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for
//!   project-internal code. Breaking changes are allowed and expected.
//! - Prefer these re-exports for clarity and consistency across callers.

// Exact vector primitives
pub use crate::vector::{
    canonicalize, dot, is_mixed_sign, is_parallel, ivec, lex_cmp, neg, primitive,
    rat_to_primitive_int, to_rational, IntVec,
};
// Polynomial kernel
pub use crate::poly::{reduce, Buchberger, GroebnerEngine, Ideal, Monomial, Poly, Term, TermOrder};
// Polyhedral services
pub use crate::solver::{facet_candidates, feasible_point, Constraint, FourierMotzkin, PolyhedralSolver};
// Fan enumeration and persistence
pub use crate::fan::{
    cone_path, read_cone, write_cone, Cone, ConeId, ConeRecord, ConeSeed, Facet, Fan, FanCfg,
    FlipCache, RingCtx, SearchEngine, UcnGen,
};
// Errors
pub use crate::error::FanError;
