//! Cones of the fan: construction from a basis, wall crossing, and the
//! reverse-search oracle.
//!
//! A cone is assembled in two steps. `ConeSeed::assemble` derives the full
//! geometric state (irredundant facet normals, flippability, wall and cone
//! interior points) from a reduced basis; it carries no UCN yet, so
//! candidate neighbors can be inspected by the search oracle without
//! consuming identifiers. `into_cone` attaches the UCN and parent link once
//! a candidate is accepted.

use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::{One, Zero};

use super::facet::{ConeId, Facet};
use crate::error::FanError;
use crate::poly::{GroebnerEngine, Ideal, Poly, TermOrder};
use crate::solver::{facet_candidates, PolyhedralSolver};
use crate::vector::{canonicalize, dot, lex_cmp, neg, rat_to_primitive_int, IntVec};

/// Ring context: arity plus the weight order the basis is reduced under.
#[derive(Clone, Debug)]
pub struct RingCtx {
    pub nvars: usize,
    pub order: TermOrder,
}

/// A full-dimensional cone of the Gröbner fan.
#[derive(Clone, Debug)]
pub struct Cone {
    pub id: ConeId,
    pub parent: Option<ConeId>,
    pub ring: RingCtx,
    pub ideal: Arc<Ideal>,
    /// The cone's reduced Gröbner basis; computed exactly once.
    pub basis: Vec<Poly>,
    /// Certified strictly positive interior weight, primitive form.
    pub interior_point: IntVec,
    facets: Vec<Facet>,
}

/// Cone state before a UCN is attached.
#[derive(Clone, Debug)]
pub struct ConeSeed {
    pub ring: RingCtx,
    pub ideal: Arc<Ideal>,
    pub basis: Vec<Poly>,
    pub interior_point: IntVec,
    pub facets: Vec<Facet>,
}

fn unit_rows(nvars: usize) -> Vec<IntVec> {
    (0..nvars)
        .map(|i| {
            let mut row = vec![BigInt::zero(); nvars];
            row[i] = BigInt::one();
            row
        })
        .collect()
}

impl ConeSeed {
    /// Derive the cone's defining walls from `basis` ("getConeNormals").
    ///
    /// Candidate rows come from the basis; the solver keeps the irredundant
    /// subset. Each facet is marked flippable iff its wall meets the open
    /// positive orthant, and gets a certified relative-interior wall point.
    /// With `with_interior_point`, the cone itself gets a certified strictly
    /// positive interior weight (required by the traversals).
    pub fn assemble<S: PolyhedralSolver>(
        ideal: Arc<Ideal>,
        basis: Vec<Poly>,
        order: TermOrder,
        solver: &S,
        with_interior_point: bool,
    ) -> Result<ConeSeed, FanError> {
        let nvars = ideal.nvars;
        let candidates = facet_candidates(&basis);
        let keep = solver.irredundant_rows(&candidates)?;
        let rows: Vec<IntVec> = keep.iter().map(|&i| candidates[i].clone()).collect();

        let units = unit_rows(nvars);
        let interior_point = if with_interior_point {
            let mut shifted = rows.clone();
            shifted.extend(units.iter().cloned());
            let p = solver.strict_point(nvars, &shifted, &[])?;
            rat_to_primitive_int(&p)
        } else {
            Vec::new()
        };

        let mut facets = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let mut facet = Facet::from_normal(row.clone(), 1);
            let others: Vec<IntVec> = rows
                .iter()
                .enumerate()
                .filter_map(|(j, r)| (j != i).then(|| r.clone()))
                .collect();
            if facet.flippable {
                // Relative interior of the wall, inside the open orthant.
                let mut shifted = others.clone();
                shifted.extend(units.iter().cloned());
                match solver.strict_point(nvars, &shifted, std::slice::from_ref(row)) {
                    Ok(p) => facet.set_interior_point(rat_to_primitive_int(&p)),
                    // Nominally flippable: the hyperplane meets the open
                    // orthant but the wall itself does not. Demote to a
                    // boundary wall.
                    Err(FanError::DegenerateCone(_)) => facet.flippable = false,
                    Err(e) => return Err(e),
                }
            }
            if !facet.flippable {
                // Boundary walls are never crossed; the point is informational.
                if let Ok(p) = solver.strict_point(nvars, &others, std::slice::from_ref(row)) {
                    facet.set_interior_point(rat_to_primitive_int(&p));
                }
            }
            facets.push(facet);
        }
        facets.sort_by(Facet::cmp_canonical);

        Ok(ConeSeed {
            ring: RingCtx { nvars, order },
            ideal,
            basis,
            interior_point,
            facets,
        })
    }

    /// Canonical normal of the facet the segment from this cone's interior
    /// point to `target` exits through; `None` when `target` lies in this
    /// cone (the traversal root). Ties at a codim-2 crossing break towards
    /// the lex-smaller canonical normal, keeping the parent map a function.
    pub fn exit_facet_towards(&self, target: &IntVec) -> Option<IntVec> {
        let q = &self.interior_point;
        debug_assert!(!q.is_empty(), "exit test requires an interior point");
        // Exit parameter through wall i is a_i / (a_i - b_i) with
        // a_i = n_i.q > 0 and b_i = n_i.target < 0; compare exactly by
        // cross-multiplication.
        let mut best: Option<(BigInt, BigInt, IntVec)> = None;
        for facet in &self.facets {
            let b = dot(facet.normal(), target);
            if b >= BigInt::zero() {
                continue;
            }
            let a = dot(facet.normal(), q);
            let d = &a - &b;
            let canon = facet.canonical_normal();
            let better = match &best {
                None => true,
                Some((ba, bd, bc)) => {
                    let lhs = &a * bd;
                    let rhs = ba * &d;
                    lhs < rhs
                        || (lhs == rhs && lex_cmp(&canon, bc) == std::cmp::Ordering::Less)
                }
            };
            if better {
                best = Some((a, d, canon));
            }
        }
        best.map(|(_, _, canon)| canon)
    }

    /// The reverse-search oracle ("isSearchFacet"): the wall crossed to
    /// reach this candidate is a search-tree edge iff it is the candidate's
    /// canonical incoming wall, i.e. the wall its interior point exits
    /// through on the straight path back to the root's interior point.
    pub fn is_search_facet(&self, crossed_canonical: &IntVec, root_point: &IntVec) -> bool {
        self.exit_facet_towards(root_point).as_ref() == Some(crossed_canonical)
    }

    /// Attach identity and parent; facets record their owning cone.
    pub fn into_cone(self, id: ConeId, parent: Option<ConeId>) -> Cone {
        let mut facets = self.facets;
        for f in &mut facets {
            f.set_ucn(id);
        }
        Cone {
            id,
            parent,
            ring: self.ring,
            ideal: self.ideal,
            basis: self.basis,
            interior_point: self.interior_point,
            facets,
        }
    }
}

impl Cone {
    /// Root cone of the fan from a strictly positive starting weight.
    pub fn root<E: GroebnerEngine, S: PolyhedralSolver>(
        ideal: Arc<Ideal>,
        start_weight: IntVec,
        engine: &E,
        solver: &S,
        id: ConeId,
    ) -> Result<Cone, FanError> {
        if start_weight.len() != ideal.nvars {
            return Err(FanError::MalformedCone(format!(
                "start weight has {} entries, ring has {} variables",
                start_weight.len(),
                ideal.nvars
            )));
        }
        if start_weight.iter().any(|w| *w <= BigInt::zero()) {
            return Err(FanError::MalformedCone(
                "start weight must be strictly positive".into(),
            ));
        }
        let order = TermOrder::weight(start_weight);
        let basis = engine.groebner_basis(ideal.generators(), &order, ideal.nvars)?;
        let seed = ConeSeed::assemble(ideal, basis, order, solver, true)?;
        Ok(seed.into_cone(id, None))
    }

    #[inline]
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    #[inline]
    pub fn num_facets(&self) -> usize {
        self.facets.len()
    }

    /// Canonical normals of all facets, in the cone's fixed facet order.
    pub fn facet_normal_set(&self) -> Vec<IntVec> {
        self.facets.iter().map(Facet::canonical_normal).collect()
    }

    /// Mark the facet identified by `canonical` as the traversal parent edge.
    pub fn mark_incoming(&mut self, canonical: &IntVec) {
        for f in &mut self.facets {
            if &f.canonical_normal() == canonical {
                f.incoming = true;
                return;
            }
        }
        debug_assert!(false, "incoming facet not found on child cone");
    }

    /// The term order that crosses `facet` into the neighboring cone:
    /// weight rows (wall interior point, outward normal), lex tail.
    pub fn flip_order(facet: &Facet) -> TermOrder {
        TermOrder::weight_then(facet.interior_point().clone(), neg(facet.normal()))
    }

    /// Codim-2 sub-facets of every facet ("getCodim2Normals"): for wall `i`,
    /// the walls `j` that cut an essential codim-2 face out of it. Pure
    /// adjacency bookkeeping; basis conversion never consults this.
    pub fn compute_codim2<S: PolyhedralSolver>(&mut self, solver: &S) -> Result<(), FanError> {
        let rows: Vec<IntVec> = self.facets.iter().map(|f| f.normal().clone()).collect();
        let id = self.id;
        for i in 0..self.facets.len() {
            let mut subs: Vec<Facet> = Vec::new();
            for (j, row) in rows.iter().enumerate() {
                if j == i {
                    continue;
                }
                // Essential on the wall: some point of the wall's hyperplane
                // satisfies the remaining rows while violating row j.
                let mut geq: Vec<IntVec> = Vec::new();
                for (k, r) in rows.iter().enumerate() {
                    if k != i && k != j {
                        geq.push(r.clone());
                    }
                }
                geq.push(neg(row));
                let wall = std::slice::from_ref(&rows[i]);
                if solver.strict_point(self.ring.nvars, &geq, wall).is_ok() {
                    let mut sub = Facet::from_normal(canonicalize(row), 2);
                    sub.set_ucn(id);
                    subs.push(sub);
                }
            }
            self.facets[i].set_codim2_facets(subs);
        }
        Ok(())
    }
}
