//! Facets: codimension-1 walls of a cone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vector::{canonicalize, is_mixed_sign, lex_cmp, IntVec};

/// Unique Cone Number: monotonically assigned, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConeId(pub u64);

impl fmt::Display for ConeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One wall of a cone.
///
/// Invariants: `normal` is the primitive inner normal (the cone satisfies
/// `normal . x >= 0`); two facets describe the same geometric wall iff their
/// canonicalized normals (first nonzero entry positive) are equal. A facet
/// is flippable iff its wall meets the open positive orthant: a mixed-sign
/// normal is necessary (the wall's hyperplane meets the orthant), and cone
/// assembly demotes the facet when the wall itself does not.
#[derive(Clone, Debug)]
pub struct Facet {
    normal: IntVec,
    interior_point: IntVec,
    owning_cone: Option<ConeId>,
    codim: usize,
    pub flippable: bool,
    /// Marks the unique edge back to the traversal parent.
    pub incoming: bool,
    /// Codim-2 sub-facets shared with neighboring walls (bookkeeping only).
    codim2: Vec<Facet>,
}

impl Facet {
    /// Zero-normal facet of the given dimension.
    pub fn new(dim: usize) -> Self {
        Facet {
            normal: crate::vector::ivec(&vec![0; dim]),
            interior_point: crate::vector::ivec(&vec![0; dim]),
            owning_cone: None,
            codim: 1,
            flippable: false,
            incoming: false,
            codim2: Vec::new(),
        }
    }

    /// Facet with the given inner normal; flippability derived from it.
    pub fn from_normal(normal: IntVec, codim: usize) -> Self {
        let flippable = is_mixed_sign(&normal);
        Facet {
            interior_point: vec![num_bigint::BigInt::from(0); normal.len()],
            normal,
            owning_cone: None,
            codim,
            flippable,
            incoming: false,
            codim2: Vec::new(),
        }
    }

    /// Copy that seeds a *different* cone: geometry is duplicated, but
    /// ownership, incoming marks, and codim-2 links stay behind.
    pub fn seed_copy(&self) -> Facet {
        Facet {
            normal: self.normal.clone(),
            interior_point: self.interior_point.clone(),
            owning_cone: None,
            codim: self.codim,
            flippable: self.flippable,
            incoming: false,
            codim2: Vec::new(),
        }
    }

    #[inline]
    pub fn normal(&self) -> &IntVec {
        &self.normal
    }

    pub fn set_normal(&mut self, normal: IntVec) {
        self.flippable = is_mixed_sign(&normal);
        self.normal = normal;
    }

    /// Canonical form of the normal: the wall's identity.
    pub fn canonical_normal(&self) -> IntVec {
        canonicalize(&self.normal)
    }

    #[inline]
    pub fn interior_point(&self) -> &IntVec {
        &self.interior_point
    }

    pub fn set_interior_point(&mut self, point: IntVec) {
        self.interior_point = point;
    }

    /// UCN of the owning cone; `None` until the facet is attached.
    #[inline]
    pub fn ucn(&self) -> Option<ConeId> {
        self.owning_cone
    }

    /// Attach to an owning cone. Set once; re-attachment is a logic error.
    pub fn set_ucn(&mut self, id: ConeId) {
        debug_assert!(
            self.owning_cone.is_none() || self.owning_cone == Some(id),
            "facet re-attached to a different cone"
        );
        self.owning_cone = Some(id);
    }

    #[inline]
    pub fn codim(&self) -> usize {
        self.codim
    }

    pub fn codim2_facets(&self) -> &[Facet] {
        &self.codim2
    }

    pub fn set_codim2_facets(&mut self, subs: Vec<Facet>) {
        self.codim2 = subs;
    }

    /// Same geometric wall, regardless of which side derived the normal.
    pub fn are_equal(a: &Facet, b: &Facet) -> bool {
        a.canonical_normal() == b.canonical_normal()
    }

    /// Deterministic facet order within a cone: lex on canonical normals.
    pub fn cmp_canonical(a: &Facet, b: &Facet) -> std::cmp::Ordering {
        lex_cmp(&a.canonical_normal(), &b.canonical_normal())
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.normal.iter().map(|x| x.to_string()).collect();
        write!(f, "({})", entries.join(", "))?;
        if !self.flippable {
            write!(f, " [boundary]")?;
        }
        if self.incoming {
            write!(f, " [incoming]")?;
        }
        Ok(())
    }
}
