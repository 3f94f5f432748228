//! Error taxonomy for fan enumeration.
//!
//! Three hard-failure classes: invariant violations (`MalformedCone`),
//! solver-reported degeneracy (`DegenerateCone`), and kernel divergence
//! (`KernelDiverged`, the pair budget of the reference Buchberger engine).
//! Absent-reference queries (e.g. the UCN of an unattached facet) are
//! `Option`s, not errors.

use thiserror::Error;

/// Errors surfaced by cone construction, traversal, and persistence.
#[derive(Debug, Error)]
pub enum FanError {
    /// The polyhedral solver could not certify irredundancy or an interior
    /// point: the cone is not full-dimensional or the system is infeasible.
    #[error("degenerate cone: {0}")]
    DegenerateCone(String),

    /// A programming invariant was violated (e.g. an unbounded or empty
    /// inequality system where a well-formed cone was expected).
    #[error("malformed cone: {0}")]
    MalformedCone(String),

    /// A traversal step required a flip but the cone has no flippable facet.
    #[error("cone has no flippable facet")]
    NoFlippableFacet,

    /// The basis conversion exceeded its S-pair budget.
    #[error("basis conversion exceeded the pair budget ({0})")]
    KernelDiverged(usize),

    /// A persisted cone record could not be read or written.
    #[error("persistence I/O: {0}")]
    Persist(#[from] std::io::Error),

    /// A persisted cone record exists but does not decode.
    #[error("persistence decode: {0}")]
    PersistDecode(#[from] serde_json::Error),

    /// A persisted record contains a number that does not parse back.
    #[error("persistence number parse: {0}")]
    PersistNumber(String),
}
