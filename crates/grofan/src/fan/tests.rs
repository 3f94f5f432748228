use std::sync::Arc;

use num_rational::BigRational;
use proptest::prelude::*;

use super::search::basis_key;
use super::*;
use crate::error::FanError;
use crate::poly::{Ideal, Monomial, Poly, TermOrder};
use crate::solver::FourierMotzkin;
use crate::vector::{canonicalize, ivec, IntVec};

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(n.into())
}

fn poly(terms: &[(i64, [u32; 2])], order: &TermOrder) -> Poly {
    Poly::from_terms(
        terms
            .iter()
            .map(|(c, e)| (Monomial(e.to_vec()), rat(*c)))
            .collect(),
        order,
    )
}

/// The parabola ideal <x^2 - y>: a fan with exactly two cones split by the
/// wall 2w1 = w2.
fn parabola() -> Arc<Ideal> {
    let order = TermOrder::weight(ivec(&[3, 1]));
    Ideal::new(2, vec![poly(&[(1, [2, 0]), (-1, [0, 1])], &order)])
}

/// <x^2 - y, y^2 - x>: three cones, the middle one between the walls
/// 2w1 = w2 and w1 = 2w2.
fn double_parabola() -> Arc<Ideal> {
    let order = TermOrder::weight(ivec(&[1, 1]));
    Ideal::new(
        2,
        vec![
            poly(&[(1, [2, 0]), (-1, [0, 1])], &order),
            poly(&[(1, [0, 2]), (-1, [1, 0])], &order),
        ],
    )
}

fn engine(start: &[i64]) -> SearchEngine {
    SearchEngine::new(FanCfg {
        start_weight: Some(ivec(start)),
        ..FanCfg::default()
    })
}

fn sorted_points(fan: &Fan) -> Vec<IntVec> {
    let mut pts = fan.interior_points();
    pts.sort();
    pts
}

#[test]
fn parabola_fan_has_two_cones_sharing_one_wall() {
    let fan = engine(&[3, 1]).reverse_search(parabola()).unwrap();
    assert_eq!(fan.len(), 2);
    let cones: Vec<_> = fan.cones().collect();
    assert_eq!(cones[0].num_facets(), 1);
    assert_eq!(cones[1].num_facets(), 1);
    assert!(Facet::are_equal(
        &cones[0].facets()[0],
        &cones[1].facets()[0]
    ));
    assert_eq!(cones[0].facets()[0].canonical_normal(), ivec(&[2, -1]));
    // The shared wall's inner normals point into opposite cones.
    assert_eq!(
        cones[0].facets()[0].normal(),
        &crate::vector::neg(cones[1].facets()[0].normal())
    );
}

#[test]
fn facet_equality_is_reflexive_symmetric_and_sign_insensitive() {
    let f = Facet::from_normal(ivec(&[2, -1]), 1);
    let g = Facet::from_normal(ivec(&[-2, 1]), 1);
    assert!(Facet::are_equal(&f, &f));
    assert!(Facet::are_equal(&f, &g));
    assert!(Facet::are_equal(&g, &f));
    let h = Facet::from_normal(ivec(&[1, -2]), 1);
    assert!(!Facet::are_equal(&f, &h));
}

#[test]
fn double_parabola_fan_has_three_cones_from_any_start() {
    let expected: Vec<Vec<Vec<u32>>> = vec![
        vec![vec![0, 1], vec![4, 0]],
        vec![vec![0, 2], vec![2, 0]],
        vec![vec![0, 4], vec![1, 0]],
    ];
    for start in [[3, 1], [1, 1], [1, 3]] {
        let fan = engine(&start).reverse_search(double_parabola()).unwrap();
        assert_eq!(fan.len(), 3, "start weight {start:?}");
        let mut keys: Vec<_> = fan.cones().map(|c| basis_key(&c.basis)).collect();
        keys.sort();
        assert_eq!(keys, expected, "start weight {start:?}");
    }
}

#[test]
fn traversals_enumerate_the_same_fan() {
    let rev = engine(&[1, 3]).reverse_search(double_parabola()).unwrap();
    let bfs = engine(&[1, 3])
        .breadth_first(double_parabola(), true)
        .unwrap();
    assert_eq!(rev.len(), bfs.len());
    assert_eq!(sorted_points(&rev), sorted_points(&bfs));
}

#[test]
fn breadth_first_discovery_modes_agree() {
    let by_point = engine(&[1, 3])
        .breadth_first(double_parabola(), true)
        .unwrap();
    let by_basis = engine(&[1, 3])
        .breadth_first(double_parabola(), false)
        .unwrap();
    assert_eq!(by_point.len(), 3);
    assert_eq!(by_basis.len(), 3);
    assert_eq!(sorted_points(&by_point), sorted_points(&by_basis));
}

#[test]
fn wall_outside_the_orthant_is_demoted_to_a_boundary_facet() {
    // {w1 - w2 >= 0, 2w1 - w2 >= 0}: the wall 2w1 = w2 has a mixed-sign
    // normal, but inside the cone it is the ray through (-1, -2), so it
    // never meets the open orthant and must come back non-flippable rather
    // than as a degenerate-cone failure.
    let order = TermOrder::weight(ivec(&[2, 1]));
    let gens = vec![
        poly(&[(1, [1, 0]), (-1, [0, 1])], &order),
        poly(&[(1, [2, 0]), (-1, [0, 1])], &order),
    ];
    let ideal = Ideal::new(2, gens.clone());
    let seed = ConeSeed::assemble(ideal, gens, order, &FourierMotzkin, true).unwrap();
    assert_eq!(seed.facets.len(), 2);
    let wall = seed
        .facets
        .iter()
        .find(|f| f.canonical_normal() == ivec(&[2, -1]))
        .unwrap();
    assert!(!wall.flippable);
    let other = seed
        .facets
        .iter()
        .find(|f| f.canonical_normal() == ivec(&[1, -1]))
        .unwrap();
    assert!(other.flippable);
}

#[test]
fn every_nonroot_cone_has_one_incoming_facet_shared_with_its_parent() {
    let fan = engine(&[1, 1]).reverse_search(double_parabola()).unwrap();
    for cone in fan.cones() {
        let incoming: Vec<_> = cone.facets().iter().filter(|f| f.incoming).collect();
        if cone.id == fan.root_id() {
            assert!(cone.parent.is_none());
            assert!(incoming.is_empty());
            continue;
        }
        assert_eq!(incoming.len(), 1, "cone {}", cone.id);
        let parent = fan.get(cone.parent.unwrap()).unwrap();
        assert!(parent
            .facets()
            .iter()
            .any(|f| Facet::are_equal(f, incoming[0])));
    }
}

#[test]
fn flipping_the_incoming_facet_returns_to_the_parent_basis() {
    let mut eng = engine(&[1, 1]);
    let fan = eng.reverse_search(double_parabola()).unwrap();
    for cone in fan.cones() {
        let Some(parent) = cone.parent else { continue };
        let back = cone
            .facets()
            .iter()
            .find(|f| f.incoming)
            .expect("non-root cone has an incoming facet");
        let (basis, _) = eng.flip(cone, back).unwrap();
        let parent = fan.get(parent).unwrap();
        assert_eq!(basis_key(&basis), basis_key(&parent.basis));
    }
}

#[test]
fn boundary_facets_are_never_flippable() {
    // Heavy-x basis {x - y^2, y^4 - y}: one orthant wall (0,1), one
    // flippable wall (1,-2).
    let fan = engine(&[3, 1]).reverse_search(double_parabola()).unwrap();
    let root = fan.get(fan.root_id()).unwrap();
    let boundary = root
        .facets()
        .iter()
        .find(|f| !f.flippable)
        .expect("heavy-x cone has an orthant wall");
    assert_eq!(boundary.canonical_normal(), ivec(&[0, 1]));
    let err = engine(&[3, 1]).flip(root, boundary).unwrap_err();
    assert!(matches!(err, FanError::NoFlippableFacet));
}

#[test]
fn cone_cap_stops_enumeration_early() {
    let mut eng = SearchEngine::new(FanCfg {
        start_weight: Some(ivec(&[1, 1])),
        max_cones: 1,
        ..FanCfg::default()
    });
    let fan = eng.reverse_search(double_parabola()).unwrap();
    assert_eq!(fan.len(), 1);
}

#[test]
fn codim2_records_are_attached_when_requested() {
    let mut eng = SearchEngine::new(FanCfg {
        start_weight: Some(ivec(&[1, 1])),
        with_codim2: true,
        ..FanCfg::default()
    });
    let fan = eng.reverse_search(double_parabola()).unwrap();
    // Middle cone {2w1 >= w2, w2 >= 2w1... } has walls (2,-1) and (-1,2);
    // each cuts one codim-2 face out of the other.
    let root = fan.get(fan.root_id()).unwrap();
    assert_eq!(root.num_facets(), 2);
    assert_eq!(
        root.facet_normal_set(),
        vec![ivec(&[1, -2]), ivec(&[2, -1])]
    );
    for facet in root.facets() {
        assert_eq!(facet.codim2_facets().len(), 1);
        assert_eq!(facet.codim2_facets()[0].codim(), 2);
    }
}

#[test]
fn ucns_are_assigned_in_acceptance_order_and_never_reused() {
    let gen = UcnGen::new();
    assert_eq!(gen.next_id(), ConeId(1));
    assert_eq!(gen.next_id(), ConeId(2));
    let fan = engine(&[1, 1]).reverse_search(double_parabola()).unwrap();
    let ids: Vec<u64> = fan.cones().map(|c| c.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(fan.root_id(), ConeId(1));
}

#[test]
fn root_rejects_nonpositive_start_weights() {
    let eng = engine(&[0, 1]);
    let err = eng.root_cone(parabola()).unwrap_err();
    assert!(matches!(err, FanError::MalformedCone(_)));
}

#[test]
fn unattached_facets_have_no_ucn() {
    let facet = Facet::new(2);
    assert!(facet.ucn().is_none());
    let fan = engine(&[3, 1]).reverse_search(parabola()).unwrap();
    for cone in fan.cones() {
        for facet in cone.facets() {
            assert_eq!(facet.ucn(), Some(cone.id));
        }
    }
}

#[test]
fn exit_facet_oracle_is_acyclic_on_the_three_cone_fan() {
    // Whatever cone hosts the root, following canonical incoming walls from
    // any other cone must reach the root without revisiting a cone.
    for start in [[3, 1], [1, 1], [1, 3]] {
        let fan = engine(&start).reverse_search(double_parabola()).unwrap();
        for cone in fan.cones() {
            let mut cur = cone;
            let mut hops = 0;
            while let Some(parent) = cur.parent {
                cur = fan.get(parent).unwrap();
                hops += 1;
                assert!(hops <= fan.len(), "parent chain cycles");
            }
            assert_eq!(cur.id, fan.root_id());
        }
    }
}

#[test]
fn persistence_round_trips_every_cone() {
    let dir = tempfile::tempdir().unwrap();
    let mut eng = SearchEngine::new(FanCfg {
        start_weight: Some(ivec(&[1, 1])),
        with_codim2: true,
        ..FanCfg::default()
    });
    let fan = eng.reverse_search(double_parabola()).unwrap();
    for cone in fan.cones() {
        write_cone(dir.path(), cone).unwrap();
    }
    for cone in fan.cones() {
        let back = read_cone(dir.path(), cone.id).unwrap();
        assert_eq!(back.id, cone.id);
        assert_eq!(back.parent, cone.parent);
        assert_eq!(back.ring.nvars, cone.ring.nvars);
        assert_eq!(back.basis, cone.basis);
        assert_eq!(back.interior_point, cone.interior_point);
        assert_eq!(back.num_facets(), cone.num_facets());
        for (a, b) in back.facets().iter().zip(cone.facets()) {
            assert!(Facet::are_equal(a, b));
            assert_eq!(a.incoming, b.incoming);
            assert_eq!(a.flippable, b.flippable);
            assert_eq!(a.interior_point(), b.interior_point());
            assert_eq!(a.ucn(), Some(cone.id));
            assert_eq!(a.codim(), b.codim());
            assert_eq!(a.codim2_facets().len(), b.codim2_facets().len());
            for (sa, sb) in a.codim2_facets().iter().zip(b.codim2_facets()) {
                assert!(Facet::are_equal(sa, sb));
                assert_eq!(sa.ucn(), sb.ucn());
                assert_eq!(sa.codim(), 2);
            }
        }
    }
}

#[test]
fn reading_a_missing_record_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_cone(dir.path(), ConeId(99)).unwrap_err();
    assert!(matches!(err, FanError::Persist(_)));
}

#[test]
fn reading_garbage_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(cone_path(dir.path(), ConeId(7)), b"not json").unwrap();
    let err = read_cone(dir.path(), ConeId(7)).unwrap_err();
    assert!(matches!(err, FanError::PersistDecode(_)));
}

#[test]
fn flip_cache_memoizes_wall_crossings() {
    let mut eng = engine(&[1, 1]);
    let fan = eng.reverse_search(double_parabola()).unwrap();
    let flips = eng.cache().len();
    assert!(flips >= fan.len() - 1);
    // Re-flipping a cached wall must not grow the table.
    let root = fan.get(fan.root_id()).unwrap();
    let wall = root.facets().iter().find(|f| f.flippable).unwrap();
    let _ = eng.flip(root, wall).unwrap();
    assert_eq!(eng.cache().len(), flips);
}

#[test]
fn resumed_cone_flips_like_the_original() {
    // Persist the root, read it back, and cross the same wall from both
    // copies; the converted bases must agree.
    let dir = tempfile::tempdir().unwrap();
    let mut eng = engine(&[3, 1]);
    let fan = eng.reverse_search(double_parabola()).unwrap();
    let root = fan.get(fan.root_id()).unwrap();
    write_cone(dir.path(), root).unwrap();
    let resumed = read_cone(dir.path(), root.id).unwrap();

    let wall = root.facets().iter().find(|f| f.flippable).unwrap();
    let again = resumed
        .facets()
        .iter()
        .find(|f| Facet::are_equal(f, wall))
        .unwrap();
    let mut fresh = engine(&[3, 1]);
    let (a, _) = eng.flip(root, wall).unwrap();
    let (b, _) = fresh.flip(&resumed, again).unwrap();
    assert_eq!(basis_key(&a), basis_key(&b));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn binomial_fans_have_exactly_two_cones(a in 1u32..=4, b in 1u32..=4) {
        let order = TermOrder::weight(ivec(&[1, 1]));
        let gen = poly(&[(1, [a, 0]), (-1, [0, b])], &order);
        let ideal = Ideal::new(2, vec![gen]);
        let rev = engine(&[1, 1]).reverse_search(ideal.clone()).unwrap();
        let bfs = engine(&[1, 1]).breadth_first(ideal, true).unwrap();
        prop_assert_eq!(rev.len(), 2);
        prop_assert_eq!(sorted_points(&rev), sorted_points(&bfs));
        for cone in rev.cones() {
            prop_assert_eq!(cone.num_facets(), 1);
            prop_assert_eq!(
                canonicalize(cone.facets()[0].normal()),
                canonicalize(&ivec(&[a as i64, -(b as i64)]))
            );
        }
    }
}
