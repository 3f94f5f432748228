//! Criterion benchmarks for fan enumeration.
//! Results: by default under target/criterion; to store elsewhere, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p grofan

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use grofan::poly::{Ideal, Monomial, Poly, TermOrder};
use grofan::prelude::*;
use num_rational::BigRational;

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(n.into())
}

fn binomial(lead: [u32; 2], trail: [u32; 2], order: &TermOrder) -> Poly {
    Poly::from_terms(
        vec![
            (Monomial(lead.to_vec()), rat(1)),
            (Monomial(trail.to_vec()), rat(-1)),
        ],
        order,
    )
}

fn double_parabola() -> Arc<Ideal> {
    let order = TermOrder::weight(ivec(&[1, 1]));
    Ideal::new(
        2,
        vec![
            binomial([2, 0], [0, 1], &order),
            binomial([0, 2], [1, 0], &order),
        ],
    )
}

fn staircase(steps: u32) -> Arc<Ideal> {
    // <x^k - y^(k+1) : 1 <= k <= steps>, a chain of walls in the plane.
    let order = TermOrder::weight(ivec(&[1, 1]));
    let gens = (1..=steps)
        .map(|k| binomial([k, 0], [0, k + 1], &order))
        .collect();
    Ideal::new(2, gens)
}

fn engine() -> SearchEngine {
    SearchEngine::new(FanCfg {
        start_weight: Some(ivec(&[1, 1])),
        ..FanCfg::default()
    })
}

fn bench_fan(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan");

    group.bench_function("reverse_search/double_parabola", |b| {
        b.iter_batched(
            || (engine(), double_parabola()),
            |(mut eng, ideal)| {
                let fan = eng.reverse_search(ideal).unwrap();
                assert_eq!(fan.len(), 3);
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("breadth_first/double_parabola", |b| {
        b.iter_batched(
            || (engine(), double_parabola()),
            |(mut eng, ideal)| {
                let _fan = eng.breadth_first(ideal, true).unwrap();
            },
            BatchSize::SmallInput,
        )
    });

    for &steps in &[1u32, 2, 3] {
        group.bench_with_input(
            BenchmarkId::new("reverse_search/staircase", steps),
            &steps,
            |b, &steps| {
                b.iter_batched(
                    || (engine(), staircase(steps)),
                    |(mut eng, ideal)| {
                        let _fan = eng.reverse_search(ideal).unwrap();
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_fan);
criterion_main!(benches);
