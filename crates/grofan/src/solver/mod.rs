//! Exact polyhedral geometry services.
//!
//! - `fm`: Fourier-Motzkin elimination over `BigRational`.
//! - `adapter`: the `PolyhedralSolver` contract consumed by cone
//!   construction, its shipped implementation, and the basis-to-inequality
//!   row builder.

pub mod adapter;
pub mod fm;

pub use adapter::{facet_candidates, FourierMotzkin, PolyhedralSolver};
pub use fm::{feasible_point, Constraint};
