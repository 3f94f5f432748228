//! The Gröbner fan of an ideal.
//!
//! Purpose
//! - Each full-dimensional cone of weight vectors induces one reduced
//!   Gröbner basis; adjacent cones share a wall and their bases differ by a
//!   single flip (basis conversion across the wall).
//! - `cone`/`facet` hold the per-cone state, `search` enumerates the fan by
//!   reverse search (and a breadth-first cross-check), `persist` writes and
//!   reads self-contained per-cone JSON records.

pub mod cone;
pub mod facet;
pub mod persist;
pub mod search;

pub use cone::{Cone, ConeSeed, RingCtx};
pub use facet::{ConeId, Facet};
pub use persist::{cone_path, read_cone, write_cone, ConeRecord};
pub use search::{Fan, FanCfg, FlipCache, SearchEngine, UcnGen};

#[cfg(test)]
mod tests;
