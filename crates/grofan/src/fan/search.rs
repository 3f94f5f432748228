//! Fan enumeration: reverse search over the cone-adjacency graph, plus a
//! queue-based breadth-first alternative.
//!
//! Purpose
//! - Reverse search needs no visited set: a candidate neighbor is accepted
//!   iff the wall it was reached through is its canonical incoming wall
//!   (the local oracle on `ConeSeed`). Memory stays proportional to the
//!   output, never to the frontier of re-derived candidates.
//! - `breadth_first` is the cross-check traversal: explicit queue plus a
//!   discovered-set keyed by the basis fingerprint. Both traversals must
//!   enumerate the same fan.
//!
//! Flips are memoized in an explicit side table keyed by (cone, wall), so a
//! wall inspected twice converts its basis once.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use super::cone::{Cone, ConeSeed};
use super::facet::{ConeId, Facet};
use crate::error::FanError;
use crate::poly::{Buchberger, GroebnerEngine, Ideal, Poly, TermOrder};
use crate::solver::{FourierMotzkin, PolyhedralSolver};
use crate::vector::{canonicalize, IntVec};

/// Traversal configuration. `Default` gives the settings used throughout
/// the test suite.
#[derive(Clone, Debug)]
pub struct FanCfg {
    /// Hard cap on enumerated cones; hitting it stops the traversal with a
    /// warning rather than an error.
    pub max_cones: usize,
    /// S-pair budget handed to the shipped Buchberger engine.
    pub max_pairs: usize,
    /// Strictly positive starting weight; `None` draws one at random.
    pub start_weight: Option<IntVec>,
    /// Seed for the random starting weight.
    pub rng_seed: u64,
    /// Also compute codim-2 adjacency records per accepted cone.
    pub with_codim2: bool,
}

impl Default for FanCfg {
    fn default() -> Self {
        FanCfg {
            max_cones: 10_000,
            max_pairs: 20_000,
            start_weight: None,
            rng_seed: 17,
            with_codim2: false,
        }
    }
}

/// Monotone UCN source; identifiers are never reused, so a cone keeps its
/// number even if the traversal later caps out.
#[derive(Debug)]
pub struct UcnGen(AtomicU64);

impl UcnGen {
    pub fn new() -> Self {
        UcnGen(AtomicU64::new(1))
    }

    pub fn next_id(&self) -> ConeId {
        ConeId(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for UcnGen {
    fn default() -> Self {
        UcnGen::new()
    }
}

/// Memo table for wall crossings: (owning cone, canonical wall normal) to
/// the converted basis on the far side.
#[derive(Debug, Default)]
pub struct FlipCache {
    table: HashMap<(ConeId, IntVec), Vec<Poly>>,
}

impl FlipCache {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// The enumerated fan: accepted cones keyed by UCN.
#[derive(Debug)]
pub struct Fan {
    cones: BTreeMap<u64, Cone>,
    root: ConeId,
}

impl Fan {
    fn new(root: Cone) -> Self {
        let id = root.id;
        let mut cones = BTreeMap::new();
        cones.insert(id.0, root);
        Fan { cones, root: id }
    }

    fn insert(&mut self, cone: Cone) {
        self.cones.insert(cone.id.0, cone);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cones.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cones.is_empty()
    }

    #[inline]
    pub fn root_id(&self) -> ConeId {
        self.root
    }

    pub fn get(&self, id: ConeId) -> Option<&Cone> {
        self.cones.get(&id.0)
    }

    pub fn cones(&self) -> impl Iterator<Item = &Cone> {
        self.cones.values()
    }

    /// Interior points of all cones, in UCN order. Each is primitive and
    /// strictly positive, so the set identifies the fan independently of
    /// traversal order.
    pub fn interior_points(&self) -> Vec<IntVec> {
        self.cones.values().map(|c| c.interior_point.clone()).collect()
    }
}

/// Leading-monomial fingerprint of a reduced basis. Distinct cones carry
/// distinct leading ideals, so this is a sound discovered-set key.
pub(crate) fn basis_key(basis: &[Poly]) -> Vec<Vec<u32>> {
    let mut key: Vec<Vec<u32>> = basis
        .iter()
        .filter(|g| !g.is_zero())
        .map(|g| g.lm().0.clone())
        .collect();
    key.sort();
    key
}

/// Discovered-set key for the queue traversal, in either keying mode.
#[derive(PartialEq, Eq, Hash)]
enum DiscoveredKey {
    InteriorPoint(IntVec),
    LeadingExponents(Vec<Vec<u32>>),
}

fn discovered_key(basis: &[Poly], interior_point: &IntVec, by_point: bool) -> DiscoveredKey {
    if by_point {
        DiscoveredKey::InteriorPoint(canonicalize(interior_point))
    } else {
        DiscoveredKey::LeadingExponents(basis_key(basis))
    }
}

/// Fan enumerator: a Gröbner engine, a polyhedral solver, and the flip memo
/// table. Both traversals hand out `Fan` values and share the cache.
pub struct SearchEngine<E = Buchberger, S = FourierMotzkin> {
    engine: E,
    solver: S,
    cfg: FanCfg,
    cache: FlipCache,
    ucn: UcnGen,
}

impl SearchEngine<Buchberger, FourierMotzkin> {
    /// Engine with the shipped Buchberger/Fourier-Motzkin stack.
    pub fn new(cfg: FanCfg) -> Self {
        let engine = Buchberger {
            max_pairs: cfg.max_pairs,
        };
        SearchEngine::with_parts(engine, FourierMotzkin, cfg)
    }
}

impl<E: GroebnerEngine, S: PolyhedralSolver> SearchEngine<E, S> {
    pub fn with_parts(engine: E, solver: S, cfg: FanCfg) -> Self {
        SearchEngine {
            engine,
            solver,
            cfg,
            cache: FlipCache::default(),
            ucn: UcnGen::new(),
        }
    }

    #[inline]
    pub fn cache(&self) -> &FlipCache {
        &self.cache
    }

    fn start_weight(&self, nvars: usize) -> IntVec {
        match &self.cfg.start_weight {
            Some(w) => w.clone(),
            None => {
                let mut rng = StdRng::seed_from_u64(self.cfg.rng_seed);
                (0..nvars)
                    .map(|_| num_bigint::BigInt::from(rng.gen_range(1..=64i64)))
                    .collect()
            }
        }
    }

    /// Root cone from the configured (or drawn) starting weight.
    pub fn root_cone(&self, ideal: Arc<Ideal>) -> Result<Cone, FanError> {
        let w = self.start_weight(ideal.nvars);
        let id = self.ucn.next_id();
        let mut root = Cone::root(ideal, w, &self.engine, &self.solver, id)?;
        if self.cfg.with_codim2 {
            root.compute_codim2(&self.solver)?;
        }
        debug!(ucn = %root.id, facets = root.num_facets(), "root cone");
        Ok(root)
    }

    /// Cross `facet` out of `cone`: converted reduced basis on the far side
    /// plus the matrix order it is reduced under. Memoized per (cone, wall).
    pub fn flip(&mut self, cone: &Cone, facet: &Facet) -> Result<(Vec<Poly>, TermOrder), FanError> {
        if !facet.flippable {
            return Err(FanError::NoFlippableFacet);
        }
        let order = Cone::flip_order(facet);
        let key = (cone.id, facet.canonical_normal());
        match self.cache.table.entry(key) {
            Entry::Occupied(hit) => Ok((hit.get().clone(), order)),
            Entry::Vacant(slot) => {
                // Seed conversion with the parent basis, never the raw ideal.
                let basis = self
                    .engine
                    .groebner_basis(&cone.basis, &order, cone.ring.nvars)?;
                slot.insert(basis.clone());
                Ok((basis, order))
            }
        }
    }

    fn accept(
        &self,
        seed: ConeSeed,
        parent: ConeId,
        crossed: &IntVec,
        fan: &mut Fan,
    ) -> Result<ConeId, FanError> {
        let id = self.ucn.next_id();
        let mut child = seed.into_cone(id, Some(parent));
        child.mark_incoming(crossed);
        if self.cfg.with_codim2 {
            child.compute_codim2(&self.solver)?;
        }
        debug!(ucn = %id, parent = %parent, facets = child.num_facets(), "accepted cone");
        fan.insert(child);
        Ok(id)
    }

    /// Reverse-search enumeration of the full fan.
    ///
    /// Every flippable, non-incoming wall of every enumerated cone is
    /// crossed once; the candidate on the far side is kept iff the crossing
    /// is the candidate's own canonical incoming edge. The parent map this
    /// induces is a spanning tree rooted at the starting cone, so each cone
    /// is accepted exactly once without a visited set.
    pub fn reverse_search(&mut self, ideal: Arc<Ideal>) -> Result<Fan, FanError> {
        let root = self.root_cone(ideal.clone())?;
        let root_point = root.interior_point.clone();
        let mut fan = Fan::new(root);
        let mut work: Vec<ConeId> = vec![fan.root_id()];

        while let Some(id) = work.pop() {
            let facets: Vec<Facet> = match fan.get(id) {
                Some(c) => c.facets().iter().map(Facet::seed_copy).collect(),
                None => continue,
            };
            for (k, facet) in facets.iter().enumerate() {
                if !facet.flippable {
                    continue;
                }
                // seed_copy clears incoming marks; consult the stored cone.
                if fan.get(id).map_or(false, |c| c.facets()[k].incoming) {
                    continue;
                }
                let cone = fan.get(id).ok_or_else(|| {
                    FanError::MalformedCone(format!("cone {id} missing from fan"))
                })?;
                let (basis, order) = self.flip(cone, facet)?;
                let seed =
                    ConeSeed::assemble(ideal.clone(), basis, order, &self.solver, true)?;
                let crossed = facet.canonical_normal();
                if !seed.is_search_facet(&crossed, &root_point) {
                    trace!(parent = %id, wall = ?crossed, "candidate rejected by oracle");
                    continue;
                }
                if fan.len() >= self.cfg.max_cones {
                    warn!(max_cones = self.cfg.max_cones, "cone cap reached, stopping");
                    return Ok(fan);
                }
                let child = self.accept(seed, id, &crossed, &mut fan)?;
                work.push(child);
            }
        }
        debug!(cones = fan.len(), flips = self.cache.len(), "reverse search done");
        Ok(fan)
    }

    /// Queue-based enumeration with an explicit discovered set, keyed by the
    /// canonicalized cone interior point when `using_interior_point` holds
    /// and by the basis' leading-exponent fingerprint otherwise. Crosses the
    /// same walls as `reverse_search` but accepts on first discovery, so it
    /// serves as an independent oracle for the reverse-search output.
    pub fn breadth_first(
        &mut self,
        ideal: Arc<Ideal>,
        using_interior_point: bool,
    ) -> Result<Fan, FanError> {
        let root = self.root_cone(ideal.clone())?;
        let mut seen: HashSet<DiscoveredKey> = HashSet::new();
        seen.insert(discovered_key(
            &root.basis,
            &root.interior_point,
            using_interior_point,
        ));
        let mut fan = Fan::new(root);
        let mut queue: VecDeque<ConeId> = VecDeque::new();
        queue.push_back(fan.root_id());

        while let Some(id) = queue.pop_front() {
            let facets: Vec<Facet> = match fan.get(id) {
                Some(c) => c.facets().iter().map(Facet::seed_copy).collect(),
                None => continue,
            };
            for (k, facet) in facets.iter().enumerate() {
                if !facet.flippable {
                    continue;
                }
                if fan.get(id).map_or(false, |c| c.facets()[k].incoming) {
                    continue;
                }
                let cone = fan.get(id).ok_or_else(|| {
                    FanError::MalformedCone(format!("cone {id} missing from fan"))
                })?;
                let (basis, order) = self.flip(cone, facet)?;
                let seed =
                    ConeSeed::assemble(ideal.clone(), basis, order, &self.solver, true)?;
                let key =
                    discovered_key(&seed.basis, &seed.interior_point, using_interior_point);
                if !seen.insert(key) {
                    trace!(parent = %id, "neighbor already discovered");
                    continue;
                }
                if fan.len() >= self.cfg.max_cones {
                    warn!(max_cones = self.cfg.max_cones, "cone cap reached, stopping");
                    return Ok(fan);
                }
                let crossed = facet.canonical_normal();
                let child = self.accept(seed, id, &crossed, &mut fan)?;
                queue.push_back(child);
            }
        }
        debug!(cones = fan.len(), flips = self.cache.len(), "breadth-first done");
        Ok(fan)
    }
}
