//! Gröbner fan enumeration core.
//!
//! The fan of an ideal partitions the strictly positive weight vectors into
//! cones, one per reduced Gröbner basis; `fan::SearchEngine` enumerates it
//! by reverse search over the implicit cone-adjacency graph, converting
//! bases incrementally at each wall crossing.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Prefer clarity and better design over compatibility; breaking changes
//!   are encouraged when they improve quality.

pub mod api;
pub mod error;
pub mod fan;
pub mod poly;
pub mod solver;
pub mod vector;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::FanError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::FanError;
    pub use crate::fan::{Cone, ConeId, Facet, Fan, FanCfg, SearchEngine};
    pub use crate::poly::{Ideal, Monomial, Poly, TermOrder};
    pub use crate::vector::{ivec, IntVec};
}
